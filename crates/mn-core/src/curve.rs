//! secp256k1 arithmetic and canonical encodings
//!
//! Thin layer over `k256` exposing exactly what the exchange needs: point
//! multiplication and addition, the identity, and fixed-width byte encodings
//! used both for display and for set membership.

use elliptic_curve::{bigint::U256, group::GroupEncoding, ops::Reduce};
use k256::{FieldBytes, ProjectivePoint, Scalar};

/// Compressed SEC1 point encoding
pub type PointBytes = [u8; 33];

/// Big-endian scalar encoding
pub type ScalarBytes = [u8; 32];

/// The group identity, starting value of every aggregation
pub fn identity() -> ProjectivePoint {
    ProjectivePoint::IDENTITY
}

/// Multiply a point by a scalar
pub fn scalar_multiply(secret: &Scalar, point: &ProjectivePoint) -> ProjectivePoint {
    *point * *secret
}

/// Add two points
pub fn point_add(a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
    *a + *b
}

/// Canonical encoding of a point.
///
/// The identity encodes as 33 zero bytes.
pub fn encode_point(point: &ProjectivePoint) -> PointBytes {
    let compressed = point.to_affine().to_bytes();
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(&compressed);
    bytes
}

/// Canonical encoding of a scalar
pub fn encode_scalar(scalar: &Scalar) -> ScalarBytes {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&scalar.to_bytes());
    bytes
}

/// Hex form of [`encode_point`]
pub fn point_hex(point: &ProjectivePoint) -> String {
    hex::encode(encode_point(point))
}

/// Hex form of [`encode_scalar`]
pub fn scalar_hex(scalar: &Scalar) -> String {
    hex::encode(encode_scalar(scalar))
}

/// Read a point's bytes as if they were a scalar.
///
/// The compressed encoding is one byte wider than a scalar, so the parity
/// prefix is dropped and the x-coordinate is reduced modulo the group order.
/// The result is a display value only: it is not the discrete log of `point`.
pub fn reinterpret_as_scalar(point: &ProjectivePoint) -> Scalar {
    let bytes = encode_point(point);
    let mut x = [0u8; 32];
    x.copy_from_slice(&bytes[1..]);
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(x))
}
