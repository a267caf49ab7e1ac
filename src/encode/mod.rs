//! Encoding side: encoder configuration and contract, the native and `ffmpeg` encoders, and
//! the output writer.

/// Encoder configuration, the [`FrameEncoder`](encoder::FrameEncoder) contract and the drain loop.
pub(crate) mod encoder;
/// `ffmpeg`-based encoder (system `ffmpeg` binary).
#[cfg(feature = "media-ffmpeg")]
pub(crate) mod ffmpeg;
/// Encoders backed by the `image` crate.
pub(crate) mod native;
/// Writing encoded bytes to disk.
pub(crate) mod output;
