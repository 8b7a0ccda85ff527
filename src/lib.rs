//! # Video Splicer
//!
//! Extract frames and stream-copied sub-clips from a video file with a
//! compact instruction list.
//!
//! An instruction list is a comma-separated string where each token is a
//! plain time (`00:13:00`, captures a frame), a range (`5-20`), a
//! "from start" shorthand (`-00:05:00`), or a "to end" shorthand
//! (`00:20:00-`). Tokens
//! are validated against the video's probed duration; invalid tokens are
//! skipped with a warning and keep their sequence number so output
//! filenames reflect the original positions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use video_splicer::{Config, SpliceEngine};
//!
//! # fn main() -> video_splicer::Result<()> {
//! let engine = SpliceEngine::new(Config::default())?;
//! let report = engine.run(Path::new("talk.mp4"), "00:00:05,10-20,30-")?;
//! println!("{} files produced", report.produced());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`instruction`] - Instruction grammar and validation
//! - [`splice`] - The run engine and per-token report
//! - [`video`] - Narrow backend interface over ffmpeg/ffprobe
//! - [`config`] - Configuration management

pub mod config;
pub mod error;
pub mod instruction;
pub mod splice;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{Result, SplicerError},
    instruction::{parse_instruction, Operation},
    splice::{Outcome, RunReport, SpliceEngine},
};
