//! Colour inversion for still images.
//!
//! The pipeline decodes the first frame of an input file, replaces every colour channel value
//! `v` with `255 - v` (alpha is left alone) and encodes the result to an output file:
//!
//! - Describe the run with an [`InvertConfig`] (JSON-loadable, every field defaulted)
//! - Call [`run`], or [`run_with_backend`] to supply your own [`MediaBackend`]
//! - Inspect the returned [`InvertReport`]
//!
//! Decoding and encoding follow a send/receive contract ([`FrameDecoder`], [`FrameEncoder`]).
//! The native backend uses the `image` crate; the `media-ffmpeg` feature adds a backend over
//! the system `ffmpeg`/`ffprobe` binaries.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod backend;
mod effects;
mod encode;
mod foundation;
mod media;
mod pipeline;

pub use crate::foundation::core::{PixelFormat, Rational, linearize_pixel_coords};
pub use crate::foundation::error::{InvertError, InvertResult};

pub use crate::media::codec::{CodecId, find_decoder, find_encoder};
pub use crate::media::frame::Frame;
pub use crate::media::packet::{Packet, Receive};

pub use crate::assets::container::{ContainerOpts, InputContainer, StreamInfo};
pub use crate::assets::decode::{
    DecodedImage, FrameDecoder, NativeDecoder, decode_first_frame, open_and_decode,
};
#[cfg(feature = "media-ffmpeg")]
pub use crate::assets::media::{FfmpegDecoder, probe_stream};

pub use crate::effects::invert::{invert_frame, invert_packed};

pub use crate::encode::encoder::{EncoderConfig, FrameEncoder, encode_frame};
#[cfg(feature = "media-ffmpeg")]
pub use crate::encode::ffmpeg::{FfmpegEncoder, find_ffmpeg_encoder, is_ffmpeg_on_path};
pub use crate::encode::native::{NativeEncoder, PngCompression, PngFilter, PngOptions};
pub use crate::encode::output::{ensure_parent_dir, write_output};

#[cfg(feature = "media-ffmpeg")]
pub use crate::backend::FfmpegBackend;
pub use crate::backend::{BackendKind, BackendSettings, MediaBackend, NativeBackend, create_backend};

pub use crate::pipeline::config::{DEFAULT_INPUT, DEFAULT_OUTPUT, InvertConfig};
pub use crate::pipeline::run::{InvertReport, run, run_with_backend};
