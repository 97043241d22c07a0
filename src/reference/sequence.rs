use std::sync::Arc;

/// Placeholder stored at index 0 so that 1-based VCF coordinates index the
/// buffer directly.
pub const SENTINEL: u8 = b'N';

/// Upper-cased bases of one chromosome, addressable by 1-based position.
///
/// Index 0 holds [`SENTINEL`] and is never returned as genomic data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    name: Arc<str>,
    bases: Vec<u8>,
}

impl ReferenceSequence {
    /// Build a sequence from raw bases (without sentinel); bases are upper-cased.
    pub fn new(name: impl Into<Arc<str>>, bases: &[u8]) -> Self {
        let mut buffer = Vec::with_capacity(bases.len() + 1);
        buffer.push(SENTINEL);
        buffer.extend(bases.iter().map(u8::to_ascii_uppercase));
        Self {
            name: name.into(),
            bases: buffer,
        }
    }

    /// Wrap a buffer that already carries the sentinel at index 0.
    pub(crate) fn from_sentinel_buffer(name: impl Into<Arc<str>>, bases: Vec<u8>) -> Self {
        debug_assert_eq!(bases.first(), Some(&SENTINEL));
        Self {
            name: name.into(),
            bases,
        }
    }

    /// Chromosome name as it appeared in the FASTA header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of real bases (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.bases.len() - 1
    }

    /// Whether the chromosome holds no bases at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Base at 1-based `position`, or `None` for position 0 or past the end.
    pub fn base(&self, position: u32) -> Option<u8> {
        if position == 0 {
            return None;
        }
        self.bases.get(position as usize).copied()
    }

    /// Bases in the 1-based inclusive range `start..=end`.
    pub fn slice(&self, start: u32, end: u32) -> Option<&[u8]> {
        if start == 0 || start > end {
            return None;
        }
        self.bases.get(start as usize..=end as usize)
    }

    /// Real bases without the sentinel.
    pub fn bases(&self) -> &[u8] {
        &self.bases[1..]
    }
}
