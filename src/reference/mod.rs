//! Reference genome access.
//!
//! A VCF position is only meaningful against the chromosome sequence it was
//! called on. This module loads that sequence by name from a FASTA file and
//! hands it out as an immutable, 1-based [`ReferenceSequence`].
//!
//! Three sources share the [`ReferenceSource`] trait:
//!
//! - [`FastaScanner`]: streams the FASTA front to back, rewinding to the last
//!   header it overran and restarting from the top when a chromosome is
//!   requested out of file order. Memory holds one chromosome at a time.
//! - [`ReferenceStore`]: parses the whole FASTA into a name-indexed map once.
//!   Handles gzip input.
//! - [`IndexedFasta`]: random access through a samtools `.fai` index.

mod indexed;
mod region;
mod scanner;
mod sequence;
mod store;

pub use indexed::IndexedFasta;
pub use region::{render_region, RegionView};
pub use scanner::FastaScanner;
pub use sequence::{ReferenceSequence, SENTINEL};
pub use store::ReferenceStore;

use std::sync::Arc;

use thiserror::Error;

/// Errors raised while locating a chromosome in the reference.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The chromosome has no header in the reference, even after a full rescan.
    #[error("chromosome '{name}' not found in reference")]
    ChromosomeNotFound {
        /// Requested chromosome name.
        name: String,
    },

    /// Requested region does not lie within the chromosome.
    #[error("region {start}-{end} is outside chromosome '{name}' of length {length}")]
    RegionOutOfRange {
        /// Chromosome name.
        name: String,
        /// 1-based start.
        start: u32,
        /// 1-based exclusive end.
        end: u32,
        /// Number of bases in the chromosome.
        length: usize,
    },

    /// Underlying read or seek failed.
    #[error("failed to read reference: {0}")]
    Io(#[from] std::io::Error),

    /// The faidx backend reported an error.
    #[error("indexed FASTA error: {0}")]
    Index(String),
}

/// Anything that can produce the sequence of a named chromosome.
pub trait ReferenceSource {
    /// Load the full sequence of `chromosome`.
    fn fetch(&mut self, chromosome: &str) -> Result<Arc<ReferenceSequence>, ReferenceError>;
}

impl<S: ReferenceSource + ?Sized> ReferenceSource for Box<S> {
    fn fetch(&mut self, chromosome: &str) -> Result<Arc<ReferenceSequence>, ReferenceError> {
        (**self).fetch(chromosome)
    }
}

/// Chromosome name declared by a FASTA header line, i.e. the first
/// whitespace-delimited token after `>`.
pub fn header_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    rest.split_whitespace().next()
}

/// Whether `line` is the header of `chromosome`.
///
/// The whole token must match: `>chr1` and `>chr1 AC:CM000663.2` match
/// `chr1`, `>chr10` does not.
pub fn header_matches(line: &str, chromosome: &str) -> bool {
    header_name(line) == Some(chromosome)
}
