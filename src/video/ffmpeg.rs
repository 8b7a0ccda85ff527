use std::path::Path;
use std::process::{Command, Stdio};

use image::GenericImageView;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ToolsConfig;
use crate::error::{Result, VideoError};
use crate::video::VideoBackend;

/// Probe and extraction backend built on external `ffmpeg`/`ffprobe`
/// processes.
pub struct FfmpegBackend {
    ffmpeg: String,
    ffprobe: String,
    overwrite: bool,
}

impl FfmpegBackend {
    /// Create a backend, verifying that the ffmpeg binary can run at all.
    pub fn new(tools: &ToolsConfig, overwrite: bool) -> Result<Self> {
        if !Self::tool_available(&tools.ffmpeg) {
            return Err(VideoError::ToolUnavailable {
                tool: tools.ffmpeg.clone(),
            }
            .into());
        }

        Ok(Self {
            ffmpeg: tools.ffmpeg.clone(),
            ffprobe: tools.ffprobe.clone(),
            overwrite,
        })
    }

    fn tool_available(tool: &str) -> bool {
        Command::new(tool)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn overwrite_flag(&self) -> &'static str {
        if self.overwrite {
            "-y"
        } else {
            "-n"
        }
    }
}

impl VideoBackend for FfmpegBackend {
    fn probe_duration(&self, video: &Path) -> Result<f64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_entries",
                "format=duration",
            ])
            .arg(video)
            .output()
            .map_err(|e| VideoError::ProbeFailed {
                path: video.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(VideoError::ProbeFailed {
                path: video.display().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let duration = parse_probe_output(&output.stdout, video)?;
        debug!("probed duration of {}: {:.2}s", video.display(), duration);
        Ok(duration)
    }

    fn capture_frame(&self, video: &Path, seconds: f64, output: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg(self.overwrite_flag())
            .arg("-ss")
            .arg(seconds.to_string())
            .arg("-i")
            .arg(video)
            .args(["-vframes", "1", "-f", "image2", "-q:v", "2"])
            .arg(output);

        debug!("running {:?}", cmd);
        let result = cmd.output().map_err(|e| VideoError::FrameCaptureFailed {
            reason: format!("{} execution failed: {}", self.ffmpeg, e),
        })?;

        if !result.status.success() {
            return Err(VideoError::FrameCaptureFailed {
                reason: format!(
                    "{} {}: {}",
                    self.ffmpeg,
                    result.status,
                    last_stderr_line(&result.stderr)
                ),
            }
            .into());
        }

        // ffmpeg exits zero even when seeking past the last frame leaves
        // nothing behind; confirm a decodable image was written.
        match image::open(output) {
            Ok(img) => {
                let (width, height) = img.dimensions();
                debug!(
                    "captured {}x{} frame at {}s -> {}",
                    width,
                    height,
                    seconds,
                    output.display()
                );
                Ok(())
            }
            Err(e) => Err(VideoError::FrameCaptureFailed {
                reason: format!("no usable frame at {}s: {}", seconds, e),
            }
            .into()),
        }
    }

    fn extract_clip(&self, video: &Path, start: f64, duration: f64, output: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg(self.overwrite_flag())
            .arg("-ss")
            .arg(start.to_string())
            .arg("-i")
            .arg(video)
            .arg("-t")
            .arg(duration.to_string())
            .args(["-c", "copy"])
            .arg(output);

        debug!("running {:?}", cmd);
        let result = cmd.output().map_err(|e| VideoError::ClipExtractionFailed {
            reason: format!("{} execution failed: {}", self.ffmpeg, e),
        })?;

        if !result.status.success() {
            return Err(VideoError::ClipExtractionFailed {
                reason: format!(
                    "{} {}: {}",
                    self.ffmpeg,
                    result.status,
                    last_stderr_line(&result.stderr)
                ),
            }
            .into());
        }

        if duration <= 0.0 {
            warn!("zero-length clip requested at {}s", start);
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

fn parse_probe_output(stdout: &[u8], video: &Path) -> Result<f64> {
    let probe: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| VideoError::ProbeFailed {
            path: video.display().to_string(),
            reason: format!("unreadable ffprobe output: {}", e),
        })?;

    probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| {
            VideoError::MissingDuration {
                path: video.display().to_string(),
            }
            .into()
        })
}

fn last_stderr_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("no diagnostic output")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{"format": {"duration": "40.120000"}}"#;
        let duration = parse_probe_output(json, Path::new("clip.mp4")).unwrap();
        assert!((duration - 40.12).abs() < 1e-9);
    }

    #[test]
    fn test_probe_output_without_duration() {
        let json = br#"{"format": {}}"#;
        let result = parse_probe_output(json, Path::new("clip.mp4"));
        assert!(matches!(
            result,
            Err(crate::error::SplicerError::Video(
                VideoError::MissingDuration { .. }
            ))
        ));
    }

    #[test]
    fn test_probe_output_garbage() {
        let result = parse_probe_output(b"not json", Path::new("clip.mp4"));
        assert!(matches!(
            result,
            Err(crate::error::SplicerError::Video(VideoError::ProbeFailed {
                ..
            }))
        ));
    }

    #[test]
    fn test_last_stderr_line() {
        assert_eq!(
            last_stderr_line(b"first\nsecond\n\n"),
            "second".to_string()
        );
        assert_eq!(last_stderr_line(b""), "no diagnostic output".to_string());
    }
}
