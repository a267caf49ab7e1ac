use std::path::Path;
use std::process::Command;

use crate::assets::container::StreamInfo;
use crate::assets::decode::FrameDecoder;
use crate::encode::ffmpeg::FfmpegProcess;
use crate::foundation::core::{PixelFormat, Rational};
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::codec::CodecId;
use crate::media::frame::Frame;
use crate::media::packet::{Packet, Receive};

/// Probe the first video stream of `path` through `ffprobe`.
pub fn probe_stream(path: &Path) -> InvertResult<StreamInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        index: Option<usize>,
        codec_name: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        pix_fmt: Option<String>,
        time_base: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-select_streams",
            "v:0",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| InvertError::probe(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(InvertError::probe(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| InvertError::probe(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| InvertError::probe(format!("no video stream in '{}'", path.display())))?;

    let width = stream
        .width
        .ok_or_else(|| InvertError::probe("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| InvertError::probe("missing video height from ffprobe"))?;
    let codec_name = stream.codec_name.unwrap_or_default();
    let pixel_format = nearest_pixel_format(stream.pix_fmt.as_deref().unwrap_or(""));
    let time_base = stream
        .time_base
        .as_deref()
        .and_then(parse_ff_ratio)
        .unwrap_or(Rational::ONE);

    Ok(StreamInfo {
        index: stream.index.unwrap_or(0),
        codec: CodecId::from_ffmpeg_name(&codec_name),
        codec_name,
        width,
        height,
        pixel_format,
        time_base,
    })
}

/// Supported layout closest to an ffmpeg `pix_fmt`, used as the decoder output format.
fn nearest_pixel_format(pix_fmt: &str) -> PixelFormat {
    if let Some(exact) = PixelFormat::from_ffmpeg_name(pix_fmt) {
        return exact;
    }
    let has_alpha = ["rgba", "bgra", "argb", "abgr", "yuva", "gbrap"]
        .iter()
        .any(|tag| pix_fmt.contains(tag));
    if pix_fmt.starts_with("ya") {
        PixelFormat::GrayAlpha8
    } else if pix_fmt.starts_with("gray") || pix_fmt.starts_with("mono") {
        PixelFormat::Gray8
    } else if has_alpha || pix_fmt == "pal8" {
        PixelFormat::Rgba8
    } else {
        PixelFormat::Rgb8
    }
}

fn parse_ff_ratio(s: &str) -> Option<Rational> {
    let (num, den) = s.split_once('/')?;
    Rational::new(num.trim().parse().ok()?, den.trim().parse().ok()?).ok()
}

/// Decoder that pipes packets into the system `ffmpeg` and reads back one raw frame.
pub struct FfmpegDecoder {
    width: u32,
    height: u32,
    format: PixelFormat,
    proc: FfmpegProcess,
    flushed: bool,
    done: bool,
}

impl FfmpegDecoder {
    /// Start an ffmpeg decoder producing frames in `stream.pixel_format`.
    pub fn open(stream: &StreamInfo) -> InvertResult<Self> {
        if stream.width == 0 || stream.height == 0 {
            return Err(InvertError::decoder(
                "stream has zero width/height (invalid source dimensions)",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-loglevel",
            "error",
            "-i",
            "pipe:0",
            "-map",
            "0:v:0",
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            stream.pixel_format.ffmpeg_name(),
            "pipe:1",
        ]);
        tracing::debug!(
            codec = %stream.codec_name,
            pix_fmt = stream.pixel_format.ffmpeg_name(),
            "starting ffmpeg decoder"
        );

        Ok(Self {
            width: stream.width,
            height: stream.height,
            format: stream.pixel_format,
            proc: FfmpegProcess::spawn(cmd, InvertError::Decoder)?,
            flushed: false,
            done: false,
        })
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

impl FrameDecoder for FfmpegDecoder {
    fn send_packet(&mut self, packet: Option<&Packet>) -> InvertResult<()> {
        let Some(packet) = packet else {
            self.flushed = true;
            self.proc.close_input();
            return Ok(());
        };
        if self.flushed {
            return Err(InvertError::decoder("packet sent after flush"));
        }
        // ffmpeg stops reading once it has its frame; the rest of the stream is dropped.
        if self.proc.is_input_open() && !self.proc.write_input(&packet.data)? {
            tracing::debug!("ffmpeg closed its input early");
        }
        Ok(())
    }

    fn receive_frame(&mut self) -> InvertResult<Receive<Frame>> {
        if self.done {
            return Ok(Receive::Eof);
        }
        if self.proc.is_input_open() && !self.proc.is_output_complete() {
            return Ok(Receive::NeedMore);
        }

        self.done = true;
        let mut bytes = self.proc.finish()?;
        let expected = self.frame_len();
        if bytes.len() < expected {
            return Err(InvertError::decoder(format!(
                "decoded frame has invalid size: got {} bytes, expected {expected}",
                bytes.len()
            )));
        }
        bytes.truncate(expected);
        Ok(Receive::Ready(Frame::from_packed(
            self.width,
            self.height,
            self.format,
            bytes,
        )?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
