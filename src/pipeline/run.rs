use std::path::PathBuf;

use crate::assets::container::ContainerOpts;
use crate::assets::decode::{DecodedImage, open_and_decode};
use crate::backend::{MediaBackend, create_backend};
use crate::effects::invert::invert_frame;
use crate::encode::encoder::{EncoderConfig, encode_frame};
use crate::encode::output::write_output;
use crate::foundation::core::PixelFormat;
use crate::foundation::error::InvertResult;
use crate::media::codec::CodecId;
use crate::pipeline::config::InvertConfig;

/// What a successful [`run`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvertReport {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Layout the frame was decoded, inverted and encoded in.
    pub pixel_format: PixelFormat,
    /// Codec of the input stream, when it has a name this crate knows.
    pub source_codec: Option<CodecId>,
    /// Codec the output was encoded with.
    pub output_codec: CodecId,
    /// Input packets consumed by the decoder.
    pub packets_read: usize,
    /// Size of the written file.
    pub bytes_written: u64,
    /// Path of the written file.
    pub output: PathBuf,
}

/// Decode the first frame of `cfg.input`, invert its colours and write it to `cfg.output`.
#[tracing::instrument(
    skip(cfg),
    fields(input = %cfg.input.display(), output = %cfg.output.display())
)]
pub fn run(cfg: &InvertConfig) -> InvertResult<InvertReport> {
    cfg.validate()?;
    let mut backend = create_backend(cfg.backend, &cfg.backend_settings())?;
    run_with_backend(cfg, backend.as_mut())
}

/// [`run`] with a caller-supplied backend.
pub fn run_with_backend(
    cfg: &InvertConfig,
    backend: &mut dyn MediaBackend,
) -> InvertResult<InvertReport> {
    cfg.validate()?;

    let opts = ContainerOpts {
        max_packet_size: cfg.max_packet_size,
    };
    let DecodedImage {
        frame,
        stream,
        packets_read,
    } = open_and_decode(&cfg.input, opts, backend)?;
    tracing::info!(
        width = frame.width(),
        height = frame.height(),
        pixel_format = %frame.format(),
        codec = %stream.codec_name,
        packets_read,
        "decoded input"
    );

    let mut frame = frame.with_alignment(cfg.row_alignment)?;
    invert_frame(&mut frame);
    tracing::debug!(linesize = frame.linesize(), "inverted frame");

    let output_codec = cfg.resolve_output_codec(stream.codec);
    if let (Some(explicit), Some(by_ext)) = (cfg.codec, CodecId::from_path(&cfg.output)) {
        if explicit != by_ext {
            tracing::warn!(
                codec = %explicit,
                extension = %by_ext,
                "output codec does not match the output file extension"
            );
        }
    }

    let enc_cfg = EncoderConfig::for_frame(output_codec, &frame);
    let bytes = {
        let mut encoder = backend.open_encoder(&enc_cfg)?;
        encode_frame(encoder.as_mut(), &frame)?
    };
    tracing::info!(codec = %output_codec, bytes = bytes.len(), "encoded output");

    let bytes_written = write_output(&cfg.output, &bytes, cfg.overwrite)?;

    Ok(InvertReport {
        width: frame.width(),
        height: frame.height(),
        pixel_format: frame.format(),
        source_codec: stream.codec,
        output_codec,
        packets_read,
        bytes_written,
        output: cfg.output.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
