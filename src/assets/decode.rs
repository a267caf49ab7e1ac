use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use crate::assets::container::{ContainerOpts, InputContainer, StreamInfo};
use crate::backend::MediaBackend;
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::codec::{CodecId, find_decoder};
use crate::media::frame::Frame;
use crate::media::packet::{Packet, Receive};

/// Packet-in / frame-out decoder contract.
///
/// Packets are submitted with `send_packet(Some(..))`; `send_packet(None)` signals end of stream.
/// `receive_frame` returns [`Receive::NeedMore`] until enough input has been seen.
pub trait FrameDecoder {
    /// Submit one packet, or flush with `None`.
    fn send_packet(&mut self, packet: Option<&Packet>) -> InvertResult<()>;
    /// Pull the next decoded frame.
    fn receive_frame(&mut self) -> InvertResult<Receive<Frame>>;
}

/// Decoder backed by the `image` crate codecs.
///
/// Buffers every packet and decodes the first frame once the stream is flushed.
#[derive(Debug)]
pub struct NativeDecoder {
    codec: CodecId,
    buf: Vec<u8>,
    flushed: bool,
    done: bool,
}

impl NativeDecoder {
    /// Open a decoder for `stream`.
    pub fn open(stream: &StreamInfo) -> InvertResult<Self> {
        let codec = stream.codec.ok_or_else(|| {
            InvertError::decoder(format!(
                "no native decoder for codec '{}'",
                stream.codec_name
            ))
        })?;
        Ok(Self {
            codec: find_decoder(codec)?,
            buf: Vec::new(),
            flushed: false,
            done: false,
        })
    }
}

impl FrameDecoder for NativeDecoder {
    fn send_packet(&mut self, packet: Option<&Packet>) -> InvertResult<()> {
        match packet {
            Some(_) if self.flushed => Err(InvertError::decoder("packet sent after flush")),
            Some(p) => {
                self.buf.extend_from_slice(&p.data);
                Ok(())
            }
            None => {
                self.flushed = true;
                Ok(())
            }
        }
    }

    fn receive_frame(&mut self) -> InvertResult<Receive<Frame>> {
        if self.done {
            return Ok(Receive::Eof);
        }
        if !self.flushed {
            return Ok(Receive::NeedMore);
        }
        self.done = true;
        if self.buf.is_empty() {
            return Ok(Receive::Eof);
        }

        let buf = std::mem::take(&mut self.buf);
        let codec = self.codec;
        let img = ImageReader::with_format(Cursor::new(buf.as_slice()), codec.image_format())
            .decode()
            .map_err(|e| InvertError::decoder(format!("could not decode {codec} frame: {e}")))?;
        Ok(Receive::Ready(Frame::from_dynamic_image(img)?))
    }
}

/// Feed packets from `input` into `decoder` until it yields a frame or the stream runs out.
pub fn decode_first_frame(
    input: &mut InputContainer,
    decoder: &mut dyn FrameDecoder,
) -> InvertResult<Frame> {
    loop {
        let packet = input.read_packet()?;
        let flushing = packet.is_none();
        decoder.send_packet(packet.as_ref())?;

        match decoder.receive_frame()? {
            Receive::Ready(frame) => {
                tracing::debug!(packets = input.packets_read(), "decoded frame");
                return Ok(frame);
            }
            Receive::NeedMore if !flushing => continue,
            Receive::NeedMore => {
                return Err(InvertError::decoder(
                    "decoder requested more data after end of stream",
                ));
            }
            Receive::Eof => {
                return Err(InvertError::decoder(format!(
                    "stream of '{}' ended before a frame was decoded",
                    input.path().display()
                )));
            }
        }
    }
}

/// The first frame of an input together with the stream it came from.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Decoded pixels.
    pub frame: Frame,
    /// Stream metadata.
    pub stream: StreamInfo,
    /// Packets consumed to produce the frame.
    pub packets_read: usize,
}

/// Open `path`, probe it, and decode its first frame with `backend`.
#[tracing::instrument(skip(opts, backend))]
pub fn open_and_decode(
    path: &Path,
    opts: ContainerOpts,
    backend: &mut dyn MediaBackend,
) -> InvertResult<DecodedImage> {
    let mut input = InputContainer::open(path, opts)?;
    let stream = backend.find_stream_info(&mut input)?;
    let mut decoder = backend.open_decoder(&stream)?;
    let frame = decode_first_frame(&mut input, decoder.as_mut())?;

    if (frame.width(), frame.height()) != (stream.width, stream.height) {
        tracing::warn!(
            probed = ?(stream.width, stream.height),
            decoded = ?(frame.width(), frame.height()),
            "decoded frame size differs from probed stream size"
        );
    }

    Ok(DecodedImage {
        frame,
        packets_read: input.packets_read(),
        stream,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
