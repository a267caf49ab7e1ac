//! Pixel effects applied between decode and encode.

/// Colour inversion.
pub(crate) mod invert;
