use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;

use super::{SinkError, VideoSink};

const MAX_STDERR_LINES: usize = 32;

/// Staged codec backend: each BGR frame is color-converted to the planar
/// I420 layout the encoder wants, then piped as raw video into an ffmpeg
/// child. The encoder buffers and reorders internally; one submitted frame
/// does not map to one immediate output packet. `close` drops stdin so the
/// child drains its queue and finalizes the container before exiting.
pub struct FfmpegSink {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_thread: Option<JoinHandle<Vec<String>>>,
    path: PathBuf,
    yuv: Mat,
    frames_written: u64,
}

impl FfmpegSink {
    pub fn open(
        path: &Path,
        width: i32,
        height: i32,
        fps: f64,
        codec: &str,
    ) -> Result<Self, SinkError> {
        let mut child = Command::new("ffmpeg")
            .args([
                "-hide_banner",
                "-loglevel",
                "warning",
                "-y",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "yuv420p",
                "-s",
                &format!("{width}x{height}"),
                "-r",
                &format!("{fps}"),
                "-i",
                "pipe:0",
                "-c:v",
                codec,
                "-pix_fmt",
                "yuv420p",
                &path.to_string_lossy(),
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SinkError::Unavailable("ffmpeg not found".to_string())
                } else {
                    SinkError::Io(e)
                }
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            SinkError::Unavailable("failed to capture ffmpeg stdin".to_string())
        })?;

        // Drain stderr on a helper thread so a chatty encoder can never
        // block against a full pipe while we are feeding stdin.
        let stderr_thread = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || collect_stderr_lines(stderr)));

        tracing::debug!(path = %path.display(), codec, "ffmpeg encoder started");

        Ok(Self {
            child: Some(child),
            stdin: Some(stdin),
            stderr_thread,
            path: path.to_path_buf(),
            yuv: Mat::default(),
            frames_written: 0,
        })
    }
}

impl VideoSink for FfmpegSink {
    fn write(&mut self, frame: &Mat) -> Result<(), SinkError> {
        imgproc::cvt_color_def(frame, &mut self.yuv, imgproc::COLOR_BGR2YUV_I420)?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SinkError::Write("sink already closed".to_string()))?;
        stdin.write_all(self.yuv.data_bytes()?)?;
        self.frames_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        // Closing stdin signals end of input; waiting lets the encoder
        // flush delayed frames and write the container trailer.
        self.stdin.take();
        let status = match self.child.take() {
            Some(mut child) => Some(child.wait()?),
            None => None,
        };

        let stderr_lines = self
            .stderr_thread
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if let Some(status) = status {
            if !status.success() {
                let detail = if stderr_lines.is_empty() {
                    String::new()
                } else {
                    format!(": {}", stderr_lines.join(" | "))
                };
                return Err(SinkError::Write(format!(
                    "ffmpeg exited with {status} for {}{detail}",
                    self.path.display()
                )));
            }
            if !stderr_lines.is_empty() {
                tracing::warn!(
                    path = %self.path.display(),
                    ffmpeg_stderr = %stderr_lines.join(" | "),
                    "encoder reported warnings"
                );
            }
        }

        tracing::info!(
            path = %self.path.display(),
            frames = self.frames_written,
            "finalized segment file"
        );
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.stdin.take();
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Keep the first batch of non-empty diagnostic lines so a failed encode
/// can report why.
fn collect_stderr_lines<R: Read>(stderr: R) -> Vec<String> {
    let mut lines = Vec::new();
    for line in BufReader::new(stderr).lines() {
        match line {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() && lines.len() < MAX_STDERR_LINES {
                    lines.push(trimmed.to_string());
                }
            }
            Err(_) => break,
        }
    }
    lines
}
