use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::encode::encoder::{EncoderConfig, FrameEncoder};
use crate::foundation::core::PixelFormat;
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::codec::{CodecId, find_encoder};
use crate::media::frame::Frame;
use crate::media::packet::{Packet, Receive};

/// PNG compression effort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    /// Fastest, largest output.
    Fast,
    /// Balanced.
    #[default]
    Default,
    /// Smallest output.
    Best,
}

/// PNG row filter strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngFilter {
    /// No filtering.
    None,
    /// Difference to the left pixel.
    Sub,
    /// Difference to the pixel above.
    Up,
    /// Difference to the average of left and above.
    Avg,
    /// Paeth predictor.
    Paeth,
    /// Pick a filter per row.
    #[default]
    Adaptive,
}

/// Tuning for the native PNG encoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PngOptions {
    /// Compression effort.
    pub compression: PngCompression,
    /// Row filter.
    pub filter: PngFilter,
}

impl PngOptions {
    fn compression_type(self) -> CompressionType {
        match self.compression {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }

    fn filter_type(self) -> FilterType {
        match self.filter {
            PngFilter::None => FilterType::NoFilter,
            PngFilter::Sub => FilterType::Sub,
            PngFilter::Up => FilterType::Up,
            PngFilter::Avg => FilterType::Avg,
            PngFilter::Paeth => FilterType::Paeth,
            PngFilter::Adaptive => FilterType::Adaptive,
        }
    }
}

/// Encoder backed by the `image` crate codecs. Accepts exactly one frame.
#[derive(Debug)]
pub struct NativeEncoder {
    cfg: EncoderConfig,
    png: PngOptions,
    pending: Option<Packet>,
    frames_sent: usize,
    flushed: bool,
}

impl NativeEncoder {
    /// Look up the encoder for `cfg.codec` and open it.
    pub fn open(cfg: &EncoderConfig, png: PngOptions) -> InvertResult<Self> {
        cfg.validate()?;
        find_encoder(cfg.codec)?;
        Ok(Self {
            cfg: cfg.clone(),
            png,
            pending: None,
            frames_sent: 0,
            flushed: false,
        })
    }

    fn encode(&self, frame: &Frame) -> InvertResult<Vec<u8>> {
        let codec = self.cfg.codec;
        let layout = native_layout(codec, self.cfg.pixel_format);
        if layout != frame.format() {
            tracing::debug!(
                from = %frame.format(),
                to = %layout,
                %codec,
                "converting frame for encoder"
            );
        }
        let frame = frame.convert(layout);

        let mut buf = Vec::new();
        let result = if codec == CodecId::Png {
            let png = self.png;
            PngEncoder::new_with_quality(&mut buf, png.compression_type(), png.filter_type())
                .write_image(
                    frame.data(),
                    frame.width(),
                    frame.height(),
                    extended_color_type(layout),
                )
        } else {
            frame
                .to_dynamic_image()?
                .write_to(&mut Cursor::new(&mut buf), codec.image_format())
        };
        result
            .map_err(|e| InvertError::encoder(format!("could not encode {codec} frame: {e}")))?;
        Ok(buf)
    }
}

impl FrameEncoder for NativeEncoder {
    fn send_frame(&mut self, frame: Option<&Frame>) -> InvertResult<()> {
        let Some(frame) = frame else {
            self.flushed = true;
            return Ok(());
        };
        if self.flushed {
            return Err(InvertError::encoder("frame sent after flush"));
        }
        if self.frames_sent > 0 {
            return Err(InvertError::encoder(format!(
                "{} encoder accepts a single frame",
                self.cfg.codec
            )));
        }
        self.cfg.check_frame(frame)?;
        self.pending = Some(Packet::new(0, self.encode(frame)?));
        self.frames_sent += 1;
        Ok(())
    }

    fn receive_packet(&mut self) -> InvertResult<Receive<Packet>> {
        if let Some(packet) = self.pending.take() {
            return Ok(Receive::Ready(packet));
        }
        if self.flushed {
            Ok(Receive::Eof)
        } else {
            Ok(Receive::NeedMore)
        }
    }
}

/// Layout the `image` encoders accept for `format` under `codec`.
///
/// There is no BGRA in the `image` crate, and JPEG/PNM carry no alpha.
/// QOI only stores RGB(A); TIFF has no grey+alpha.
fn native_layout(codec: CodecId, format: PixelFormat) -> PixelFormat {
    let format = match (codec, format) {
        (_, PixelFormat::Bgra8) => PixelFormat::Rgba8,
        (CodecId::Qoi, PixelFormat::Gray8) => PixelFormat::Rgb8,
        (CodecId::Qoi | CodecId::Tiff, PixelFormat::GrayAlpha8) => PixelFormat::Rgba8,
        (_, other) => other,
    };
    if codec.supports_alpha() {
        return format;
    }
    match format {
        PixelFormat::GrayAlpha8 => PixelFormat::Gray8,
        PixelFormat::Rgba8 => PixelFormat::Rgb8,
        other => other,
    }
}

fn extended_color_type(format: PixelFormat) -> ExtendedColorType {
    match format {
        PixelFormat::Gray8 => ExtendedColorType::L8,
        PixelFormat::GrayAlpha8 => ExtendedColorType::La8,
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba8 | PixelFormat::Bgra8 => ExtendedColorType::Rgba8,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/native.rs"]
mod tests;
