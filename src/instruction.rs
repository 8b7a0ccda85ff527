//! # Instruction Parsing
//!
//! Turns one comma-separated instruction token plus the video's duration
//! into a validated [`Operation`], or a typed rejection.
//!
//! The grammar accepts four shapes:
//!
//! - `T`: capture a single frame at time `T`
//! - `-T`: clip from the start of the video to `T`
//! - `T-`: clip from `T` to the end of the video
//! - `S-E`: clip from `S` to `E`
//!
//! where a time literal is `H:MM:SS`, `MM:SS`, or plain `SS`. A leading `-`
//! is always the "from start" shorthand, never a negative number; negative
//! times are not representable.

use crate::error::InstructionError;

/// A parsed, validated frame or clip request.
///
/// Times are in seconds. Parsed literals are whole-second values; a
/// "to end" clip carries the probed (possibly fractional) duration as its
/// end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Capture a single frame at `at` seconds.
    Frame { at: f64 },
    /// Extract the range `[start, end)` as a stream-copied clip.
    Clip { start: f64, end: f64 },
}

impl Operation {
    /// Start of the operation in seconds (for a frame, its timestamp).
    pub fn start(&self) -> f64 {
        match self {
            Operation::Frame { at } => *at,
            Operation::Clip { start, .. } => *start,
        }
    }

    /// End of the operation in seconds (for a frame, its timestamp).
    pub fn end(&self) -> f64 {
        match self {
            Operation::Frame { at } => *at,
            Operation::Clip { end, .. } => *end,
        }
    }

    /// Length of the requested range in seconds (zero for frames).
    pub fn span(&self) -> f64 {
        self.end() - self.start()
    }
}

/// Convert a colon-separated time literal to total whole seconds.
///
/// Accepts 1-3 non-negative integer components: `H:MM:SS`, `MM:SS`, or
/// `SS`. Returns `None` for anything else, including non-integer
/// components.
pub fn time_to_seconds(text: &str) -> Option<u64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut fields = [0u64; 3];
    for (i, part) in parts.iter().enumerate() {
        fields[i] = part.parse().ok()?;
    }

    Some(match parts.len() {
        3 => fields[0] * 3600 + fields[1] * 60 + fields[2],
        2 => fields[0] * 60 + fields[1],
        _ => fields[0],
    })
}

/// Parse one instruction token against the video duration.
///
/// Returns `Ok(None)` for an empty or whitespace-only token (no operation),
/// `Ok(Some(op))` for a valid one, and `Err(_)` with the rejection reason
/// otherwise. Rejection is a per-token signal consumed by the engine, not a
/// fatal error.
pub fn parse_instruction(
    raw: &str,
    duration: f64,
) -> Result<Option<Operation>, InstructionError> {
    let instruction = raw.trim();
    if instruction.is_empty() {
        return Ok(None);
    }

    // Plain time literal: a single frame capture.
    if !instruction.contains('-') {
        let at = parse_bounded(instruction, duration)?;
        return Ok(Some(Operation::Frame { at: at as f64 }));
    }

    // Leading '-': clip from the start of the video.
    if let Some(rest) = instruction.strip_prefix('-') {
        let end = parse_bounded(rest, duration)?;
        return Ok(Some(Operation::Clip {
            start: 0.0,
            end: end as f64,
        }));
    }

    // Trailing '-': clip to the end of the video.
    if let Some(rest) = instruction.strip_suffix('-') {
        let start = parse_bounded(rest, duration)?;
        return Ok(Some(Operation::Clip {
            start: start as f64,
            end: duration,
        }));
    }

    // Explicit range: exactly two literals separated by one '-'.
    let parts: Vec<&str> = instruction.split('-').collect();
    if parts.len() != 2 {
        return Err(InstructionError::UnrecognizedShape);
    }

    let start = parse_literal(parts[0])?;
    let end = parse_literal(parts[1])?;
    if start >= end {
        return Err(InstructionError::EmptyRange { start, end });
    }
    if end as f64 > duration {
        return Err(InstructionError::PastEnd {
            seconds: end,
            duration,
        });
    }

    Ok(Some(Operation::Clip {
        start: start as f64,
        end: end as f64,
    }))
}

fn parse_literal(literal: &str) -> Result<u64, InstructionError> {
    time_to_seconds(literal).ok_or_else(|| InstructionError::MalformedTime {
        literal: literal.to_string(),
    })
}

fn parse_bounded(literal: &str, duration: f64) -> Result<u64, InstructionError> {
    let seconds = parse_literal(literal)?;
    if seconds as f64 > duration {
        return Err(InstructionError::PastEnd { seconds, duration });
    }
    Ok(seconds)
}
