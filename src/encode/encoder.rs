use crate::foundation::core::{PixelFormat, Rational};
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::codec::CodecId;
use crate::media::frame::Frame;
use crate::media::packet::{Packet, Receive};

/// Configuration an encoder is opened with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Output codec.
    pub codec: CodecId,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Layout of the frames that will be submitted.
    pub pixel_format: PixelFormat,
    /// Nominal time base; still images use 1/1.
    pub time_base: Rational,
}

impl EncoderConfig {
    /// Configure an encoder for `frame`: size and pixel format are taken from the frame.
    pub fn for_frame(codec: CodecId, frame: &Frame) -> Self {
        Self {
            codec,
            width: frame.width(),
            height: frame.height(),
            pixel_format: frame.format(),
            time_base: Rational::ONE,
        }
    }

    /// Reject configurations no encoder can open.
    pub fn validate(&self) -> InvertResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(InvertError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.time_base.num == 0 || self.time_base.den == 0 {
            return Err(InvertError::validation("encode time base must be non-zero"));
        }
        Ok(())
    }

    /// Check that `frame` matches the configured size.
    pub fn check_frame(&self, frame: &Frame) -> InvertResult<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(InvertError::encoder(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// Frame-in / packet-out encoder contract.
///
/// Frames are submitted with `send_frame(Some(..))`; `send_frame(None)` flushes.
/// `receive_packet` is drained until it returns [`Receive::Eof`].
pub trait FrameEncoder {
    /// Submit one frame, or flush with `None`.
    fn send_frame(&mut self, frame: Option<&Frame>) -> InvertResult<()>;
    /// Pull the next encoded packet.
    fn receive_packet(&mut self) -> InvertResult<Receive<Packet>>;
}

/// Encode `frame` with `encoder`, flush it and concatenate every packet it emits.
pub fn encode_frame(encoder: &mut dyn FrameEncoder, frame: &Frame) -> InvertResult<Vec<u8>> {
    encoder.send_frame(Some(frame))?;
    encoder.send_frame(None)?;

    let mut out = Vec::new();
    let mut packets = 0usize;
    loop {
        match encoder.receive_packet()? {
            Receive::Ready(packet) => {
                packets += 1;
                out.extend_from_slice(&packet.data);
            }
            Receive::NeedMore => {
                return Err(InvertError::encoder(
                    "encoder requested more input after flush",
                ));
            }
            Receive::Eof => break,
        }
    }

    if packets == 0 || out.is_empty() {
        return Err(InvertError::encoder("encoder produced no packet"));
    }
    tracing::debug!(packets, bytes = out.len(), "drained encoder");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
