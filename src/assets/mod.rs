//! Decoding side: input containers, the decoder contract and the decode loop.

/// Input containers and stream probing.
pub(crate) mod container;
/// The [`FrameDecoder`](decode::FrameDecoder) contract, the native decoder and the decode loop.
pub(crate) mod decode;
/// `ffprobe`/`ffmpeg`-based probing and decoding (system binaries).
#[cfg(feature = "media-ffmpeg")]
pub(crate) mod media;
