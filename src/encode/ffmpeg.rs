use std::io::Read;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::encoder::{EncoderConfig, FrameEncoder};
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::codec::CodecId;
use crate::media::frame::Frame;
use crate::media::packet::{Packet, Receive};

type PipeDrain = JoinHandle<std::io::Result<Vec<u8>>>;

/// A running `ffmpeg` child with piped stdio.
///
/// stdout and stderr are drained on background threads so writing stdin never deadlocks.
/// The child is killed and reaped on drop if it was not finished.
pub(crate) struct FfmpegProcess {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<PipeDrain>,
    stderr_drain: Option<PipeDrain>,
    err: fn(String) -> InvertError,
}

impl FfmpegProcess {
    /// Spawn `cmd`; failures are reported through `err`.
    pub(crate) fn spawn(mut cmd: Command, err: fn(String) -> InvertError) -> InvertResult<Self> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            err(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| err("failed to open ffmpeg stdin (unexpected)".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| err("failed to open ffmpeg stdout (unexpected)".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| err("failed to open ffmpeg stderr (unexpected)".to_string()))?;

        Ok(Self {
            child: Some(child),
            stdin: Some(stdin),
            stdout_drain: Some(drain(stdout)),
            stderr_drain: Some(drain(stderr)),
            err,
        })
    }

    /// Whether stdin is still open.
    pub(crate) fn is_input_open(&self) -> bool {
        self.stdin.is_some()
    }

    /// Whether ffmpeg has closed its stdout (it has exited or is about to).
    pub(crate) fn is_output_complete(&self) -> bool {
        self.stdout_drain
            .as_ref()
            .is_some_and(|handle| handle.is_finished())
    }

    /// Write to stdin. Returns `false` if ffmpeg already closed its end.
    pub(crate) fn write_input(&mut self, bytes: &[u8]) -> InvertResult<bool> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err((self.err)("ffmpeg input is already closed".to_string()));
        };

        use std::io::Write as _;
        match stdin.write_all(bytes) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                self.close_input();
                Ok(false)
            }
            Err(e) => Err((self.err)(format!("failed to write to ffmpeg stdin: {e}"))),
        }
    }

    /// Close stdin, signalling end of input.
    pub(crate) fn close_input(&mut self) {
        drop(self.stdin.take());
    }

    /// Close stdin, wait for exit and return everything ffmpeg wrote to stdout.
    pub(crate) fn finish(&mut self) -> InvertResult<Vec<u8>> {
        let err = self.err;
        self.close_input();
        let mut child = self
            .child
            .take()
            .ok_or_else(|| err("ffmpeg process already finished".to_string()))?;

        let stdout = join_drain(self.stdout_drain.take(), "stdout", err)?;
        let status = child
            .wait()
            .map_err(|e| err(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr = join_drain(self.stderr_drain.take(), "stderr", err)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(err(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(stdout)
    }
}

impl Drop for FfmpegProcess {
    fn drop(&mut self) {
        self.close_input();
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> PipeDrain {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn join_drain(
    handle: Option<PipeDrain>,
    name: &str,
    err: fn(String) -> InvertError,
) -> InvertResult<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| err(format!("ffmpeg {name} drain thread panicked")))?
            .map_err(|e| err(format!("ffmpeg {name} read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Encoder that pipes one raw frame through the system `ffmpeg`.
pub struct FfmpegEncoder {
    cfg: EncoderConfig,
    proc: FfmpegProcess,
    frames_sent: usize,
    done: bool,
}

impl FfmpegEncoder {
    /// Look up the ffmpeg encoder for `cfg.codec` and start it.
    pub fn open(cfg: &EncoderConfig) -> InvertResult<Self> {
        cfg.validate()?;
        let encoder = find_ffmpeg_encoder(cfg.codec)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            cfg.pixel_format.ffmpeg_name(),
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            // For rawvideo input the rate is the inverse of the time base.
            "-r",
            &format!("{}/{}", cfg.time_base.den, cfg.time_base.num),
            "-i",
            "pipe:0",
            "-frames:v",
            "1",
            "-c:v",
            encoder,
            "-f",
            "image2pipe",
            "pipe:1",
        ]);
        tracing::debug!(
            encoder,
            pix_fmt = cfg.pixel_format.ffmpeg_name(),
            "starting ffmpeg encoder"
        );

        Ok(Self {
            cfg: cfg.clone(),
            proc: FfmpegProcess::spawn(cmd, InvertError::Encoder)?,
            frames_sent: 0,
            done: false,
        })
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn send_frame(&mut self, frame: Option<&Frame>) -> InvertResult<()> {
        let Some(frame) = frame else {
            self.proc.close_input();
            return Ok(());
        };
        if !self.proc.is_input_open() {
            return Err(InvertError::encoder("frame sent after flush"));
        }
        if self.frames_sent > 0 {
            return Err(InvertError::encoder(
                "ffmpeg image encoder accepts a single frame",
            ));
        }
        self.cfg.check_frame(frame)?;

        let raw = frame.convert(self.cfg.pixel_format);
        if !self.proc.write_input(raw.data())? {
            return Err(self.proc.finish().err().unwrap_or_else(|| {
                InvertError::encoder("ffmpeg closed its input before the frame was written")
            }));
        }
        self.frames_sent += 1;
        Ok(())
    }

    fn receive_packet(&mut self) -> InvertResult<Receive<Packet>> {
        if self.done {
            return Ok(Receive::Eof);
        }
        if self.proc.is_input_open() {
            return Ok(Receive::NeedMore);
        }
        self.done = true;
        let bytes = self.proc.finish()?;
        if bytes.is_empty() {
            return Err(InvertError::encoder("ffmpeg produced no packet"));
        }
        Ok(Receive::Ready(Packet::new(0, bytes)))
    }
}

/// Name of the ffmpeg encoder for `codec`, checked against `ffmpeg -encoders`.
pub fn find_ffmpeg_encoder(codec: CodecId) -> InvertResult<&'static str> {
    let name = codec.ffmpeg_encoder_name().ok_or_else(|| {
        InvertError::encoder(format!("ffmpeg has no encoder for codec '{codec}'"))
    })?;
    let out = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .map_err(|e| InvertError::encoder(format!("failed to run ffmpeg -encoders: {e}")))?;
    if !out.status.success() || !codec_listed(&String::from_utf8_lossy(&out.stdout), name) {
        return Err(InvertError::encoder(format!(
            "ffmpeg encoder '{name}' is not available"
        )));
    }
    Ok(name)
}

/// Whether an `ffmpeg -encoders` / `-decoders` listing contains `name`.
fn codec_listed(listing: &str, name: &str) -> bool {
    listing
        .lines()
        .any(|line| line.split_whitespace().nth(1) == Some(name))
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
