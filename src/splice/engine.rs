use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{Result, VideoError},
    instruction::{parse_instruction, Operation},
    splice::report::{InstructionRecord, Outcome, RunReport},
    video::{FfmpegBackend, VideoBackend},
};

/// Orchestrates one splicing run.
///
/// The engine walks the comma-separated instruction list in order:
/// 1. Probe the video duration once.
/// 2. Create the output directory idempotently.
/// 3. Parse each token against the duration bound.
/// 4. Dispatch frames and clips to the backend, isolating per-token
///    failures.
///
/// Every token consumes one sequence number whether or not it produces
/// output, so filenames reflect original instruction positions.
pub struct SpliceEngine {
    config: Config,
    backend: Box<dyn VideoBackend>,
}

impl SpliceEngine {
    /// Create an engine backed by external ffmpeg/ffprobe processes.
    pub fn new(config: Config) -> Result<Self> {
        let backend = FfmpegBackend::new(&config.tools, config.output.overwrite)?;
        Ok(Self {
            config,
            backend: Box::new(backend),
        })
    }

    /// Create an engine with a custom backend.
    pub fn with_backend(config: Config, backend: Box<dyn VideoBackend>) -> Self {
        Self { config, backend }
    }

    /// Run the instruction list against `video` and report what happened.
    pub fn run(&self, video: &Path, instructions: &str) -> Result<RunReport> {
        if !video.exists() {
            return Err(VideoError::NotFound {
                path: video.display().to_string(),
            }
            .into());
        }

        let duration = self.backend.probe_duration(video)?;
        let base = video
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video")
            .to_string();

        let output_dir = &self.config.output.directory;
        fs::create_dir_all(output_dir)?;

        info!("🎬 Splicing {} ({:.1}s)", video.display(), duration);
        info!("   Output directory: {}", output_dir.display());

        let mut records = Vec::new();
        for (index, token) in instructions.split(',').enumerate() {
            let sequence = index + 1;
            let outcome = self.run_instruction(video, duration, &base, sequence, token);
            let halt = self.config.splice.halt_on_failure
                && matches!(outcome, Outcome::Failed { .. });

            records.push(InstructionRecord {
                sequence,
                instruction: token.to_string(),
                outcome,
            });

            if halt {
                warn!("halting after failed instruction #{}", sequence);
                break;
            }
        }

        let report = RunReport {
            video: video.to_path_buf(),
            duration,
            records,
        };
        info!(
            "✅ Done: {} outputs, {} rejected, {} failed",
            report.produced(),
            report.rejected(),
            report.failed()
        );
        Ok(report)
    }

    fn run_instruction(
        &self,
        video: &Path,
        duration: f64,
        base: &str,
        sequence: usize,
        token: &str,
    ) -> Outcome {
        let operation = match parse_instruction(token, duration) {
            Ok(Some(operation)) => operation,
            Ok(None) => {
                debug!("instruction #{} is empty, nothing to do", sequence);
                return Outcome::Skipped;
            }
            Err(reason) => {
                warn!("⚠️ Skipping invalid instruction '{}': {}", token, reason);
                return Outcome::Rejected { reason };
            }
        };

        match operation {
            Operation::Frame { at } => {
                let output = self
                    .config
                    .output
                    .directory
                    .join(format!("{}_frame_{}.jpg", base, sequence));

                match self.backend.capture_frame(video, at, &output) {
                    Ok(()) => {
                        info!("🖼️  Saved frame at {}s -> {}", at, output.display());
                        Outcome::Frame {
                            seconds: at,
                            output,
                        }
                    }
                    Err(reason) => {
                        warn!("❌ Failed to save frame: {}", reason);
                        Outcome::Failed { reason }
                    }
                }
            }
            Operation::Clip { start, end } => {
                let output = self
                    .config
                    .output
                    .directory
                    .join(format!("{}_clip_{}.mp4", base, sequence));

                match self.backend.extract_clip(video, start, end - start, &output) {
                    Ok(()) => {
                        info!(
                            "🎞️  Saved clip {}-{}s -> {}",
                            start,
                            end,
                            output.display()
                        );
                        Outcome::Clip { start, end, output }
                    }
                    Err(reason) => {
                        warn!("❌ Failed to extract clip: {}", reason);
                        Outcome::Failed { reason }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;
    use tempfile::{tempdir, TempDir};

    #[derive(Debug, PartialEq)]
    enum Call {
        Frame { seconds: f64 },
        Clip { start: f64, duration: f64 },
    }

    struct MockBackend {
        duration: f64,
        fail_frames: bool,
        fail_clips: bool,
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl MockBackend {
        fn new(duration: f64) -> Self {
            Self {
                duration,
                fail_frames: false,
                fail_clips: false,
                calls: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl VideoBackend for MockBackend {
        fn probe_duration(&self, _video: &Path) -> Result<f64> {
            Ok(self.duration)
        }

        fn capture_frame(&self, _video: &Path, seconds: f64, output: &Path) -> Result<()> {
            self.calls.borrow_mut().push(Call::Frame { seconds });
            if self.fail_frames {
                return Err(VideoError::FrameCaptureFailed {
                    reason: "decode error".to_string(),
                }
                .into());
            }
            fs::write(output, b"jpg")?;
            Ok(())
        }

        fn extract_clip(
            &self,
            _video: &Path,
            start: f64,
            duration: f64,
            output: &Path,
        ) -> Result<()> {
            self.calls.borrow_mut().push(Call::Clip { start, duration });
            if self.fail_clips {
                return Err(VideoError::ClipExtractionFailed {
                    reason: "exit status: 1".to_string(),
                }
                .into());
            }
            fs::write(output, b"mp4")?;
            Ok(())
        }
    }

    fn workspace() -> (TempDir, Config, PathBuf) {
        let dir = tempdir().unwrap();
        let video = dir.path().join("talk.mp4");
        fs::write(&video, b"fake video").unwrap();

        let mut config = Config::default();
        config.output.directory = dir.path().join("out");
        (dir, config, video)
    }

    fn engine_with(config: Config, backend: MockBackend) -> SpliceEngine {
        SpliceEngine::with_backend(config, Box::new(backend))
    }

    #[test]
    fn test_frames_and_clips_share_one_counter() {
        let (_dir, config, video) = workspace();
        let out_dir = config.output.directory.clone();
        let engine = engine_with(config, MockBackend::new(40.0));

        let report = engine.run(&video, "00:00:05,10-20,30-").unwrap();

        assert_eq!(report.duration, 40.0);
        assert_eq!(report.records.len(), 3);
        assert!(report.is_clean());

        let outputs = report.outputs();
        assert_eq!(outputs[0], out_dir.join("talk_frame_1.jpg"));
        assert_eq!(outputs[1], out_dir.join("talk_clip_2.mp4"));
        assert_eq!(outputs[2], out_dir.join("talk_clip_3.mp4"));
        assert!(outputs.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_backend_receives_start_and_span() {
        let (_dir, config, video) = workspace();
        let backend = MockBackend::new(40.0);
        let calls = Rc::clone(&backend.calls);
        let engine = engine_with(config, backend);

        engine.run(&video, "00:00:05,10-20,30-").unwrap();

        // Clips are dispatched as (start, length); the "to end" clip runs
        // to the probed duration.
        assert_eq!(
            *calls.borrow(),
            vec![
                Call::Frame { seconds: 5.0 },
                Call::Clip {
                    start: 10.0,
                    duration: 10.0
                },
                Call::Clip {
                    start: 30.0,
                    duration: 10.0
                },
            ]
        );
    }

    #[test]
    fn test_rejected_token_keeps_its_sequence_number() {
        let (_dir, config, video) = workspace();
        let out_dir = config.output.directory.clone();
        let engine = engine_with(config, MockBackend::new(20.0));

        let report = engine.run(&video, "5,bogus,15").unwrap();

        assert_eq!(report.records.len(), 3);
        assert!(matches!(
            report.records[1].outcome,
            Outcome::Rejected { .. }
        ));
        assert_eq!(report.records[1].instruction, "bogus");

        // Outputs are numbered 1 and 3, not renumbered densely.
        let outputs = report.outputs();
        assert_eq!(outputs[0], out_dir.join("talk_frame_1.jpg"));
        assert_eq!(outputs[1], out_dir.join("talk_frame_3.jpg"));
        assert!(!out_dir.join("talk_frame_2.jpg").exists());
    }

    #[test]
    fn test_empty_tokens_consume_sequence_numbers() {
        let (_dir, config, video) = workspace();
        let out_dir = config.output.directory.clone();
        let engine = engine_with(config, MockBackend::new(20.0));

        let report = engine.run(&video, "5,,7").unwrap();

        assert!(matches!(report.records[1].outcome, Outcome::Skipped));
        assert_eq!(report.outputs()[1], out_dir.join("talk_frame_3.jpg"));
        assert!(report.is_clean());
    }

    #[test]
    fn test_backend_failure_does_not_abort_run() {
        let (_dir, config, video) = workspace();
        let mut backend = MockBackend::new(40.0);
        backend.fail_frames = true;
        let engine = engine_with(config, backend);

        let report = engine.run(&video, "5,10-20").unwrap();

        assert_eq!(report.records.len(), 2);
        assert!(matches!(report.records[0].outcome, Outcome::Failed { .. }));
        assert!(matches!(report.records[1].outcome, Outcome::Clip { .. }));
        assert_eq!(report.failed(), 1);
        assert_eq!(report.produced(), 1);
    }

    #[test]
    fn test_halt_on_failure_stops_early() {
        let (_dir, mut config, video) = workspace();
        config.splice.halt_on_failure = true;
        let mut backend = MockBackend::new(40.0);
        backend.fail_clips = true;
        let engine = engine_with(config, backend);

        let report = engine.run(&video, "1-2,5,7").unwrap();

        // The failed clip is recorded, the rest never ran.
        assert_eq!(report.records.len(), 1);
        assert!(matches!(report.records[0].outcome, Outcome::Failed { .. }));
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let (dir, config, _video) = workspace();
        let engine = engine_with(config, MockBackend::new(40.0));

        let missing = dir.path().join("nope.mp4");
        let result = engine.run(&missing, "5");
        assert!(matches!(
            result,
            Err(crate::error::SplicerError::Video(VideoError::NotFound {
                ..
            }))
        ));
    }

    #[test]
    fn test_output_directory_created_idempotently() {
        let (_dir, config, video) = workspace();
        let out_dir = config.output.directory.clone();
        fs::create_dir_all(&out_dir).unwrap();

        let engine = engine_with(config, MockBackend::new(40.0));
        engine.run(&video, "5").unwrap();
        assert!(out_dir.is_dir());
    }
}
