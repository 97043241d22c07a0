use std::fmt;

use super::{ReferenceError, ReferenceSequence};

/// A stretch of reference printed under a position ruler.
///
/// ```text
///       0123 45678 9
/// 1020:GCTA GCCTA G
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionView {
    /// Line of position digits (`position % 10`).
    pub ruler: String,
    /// `start:` followed by the bases.
    pub bases: String,
}

impl fmt::Display for RegionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.ruler)?;
        write!(f, "{}", self.bases)
    }
}

/// Render bases `start..end` (1-based, end exclusive) of `sequence`.
///
/// A space follows every position divisible by 5 on both lines.
pub fn render_region(
    sequence: &ReferenceSequence,
    start: u32,
    end: u32,
) -> Result<RegionView, ReferenceError> {
    let out_of_range = || ReferenceError::RegionOutOfRange {
        name: sequence.name().to_string(),
        start,
        end,
        length: sequence.len(),
    };
    if start == 0 || end <= start {
        return Err(out_of_range());
    }
    let bases = sequence.slice(start, end - 1).ok_or_else(out_of_range)?;

    let mut bottom = format!("{start}:");
    let mut ruler = " ".repeat(bottom.len());
    for (position, &base) in (start..end).zip(bases) {
        ruler.push(char::from(b'0' + (position % 10) as u8));
        bottom.push(char::from(base));
        if position % 5 == 0 {
            ruler.push(' ');
            bottom.push(' ');
        }
    }

    Ok(RegionView {
        ruler,
        bases: bottom,
    })
}
