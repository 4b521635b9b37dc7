//! MessagePack persistence for the committed document.
//!
//! Shapes store point and style *handles*, and the arena serializes
//! handle → node, so two fields referencing the same point before encoding
//! reference the same point after decoding — the reference topology is part
//! of the format, not reconstructed heuristically.
//!
//! Transient state (selection, hover, decorators, clipboard) is skipped on
//! write and comes back empty.

use crate::canvas::Canvas;

/// Encode the document to MessagePack bytes.
pub fn to_bytes(canvas: &Canvas) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec(canvas)
}

/// Decode a document previously written by [`to_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<Canvas, rmp_serde::decode::Error> {
    rmp_serde::from_slice(bytes)
}
