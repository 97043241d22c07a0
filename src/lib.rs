//! # Indel left-alignment for VCF files
//!
//! Variant callers do not agree on where to place an insertion or deletion
//! inside a repeat: `GCACACT` with one `CA` removed can be reported at
//! position 1, 2, 3 or 4. Comparing call sets therefore needs every indel in
//! one canonical place, the leftmost, and needs symbolic encodings
//! (`<INS>` + `SEQ=`, `<DEL>` + `SVLEN=`) turned into literal bases first.
//!
//! ## Pieces
//!
//! 1. **Reference** ([`reference`]): chromosome sequences from FASTA, 1-based
//! 2. **Events** ([`variant`]): VCF lines, classification, symbolic expansion
//! 3. **Left-alignment** ([`normalize`]): the pure shifting algorithm
//! 4. **Pipeline** ([`pipeline`]): streaming driver with error policies
//!
//! ## Usage Example
//!
//! ```
//! use vcfalign::normalize::left_align;
//! use vcfalign::reference::ReferenceSequence;
//! use vcfalign::variant::VariantEvent;
//!
//! let reference = ReferenceSequence::new("chr1", b"GCACACT");
//! let event = VariantEvent::parse("chr1\t4\t.\tCAC\tC").unwrap();
//! let aligned = left_align(&event, &reference).unwrap();
//! assert_eq!(aligned.event.to_line(), "chr1\t1\t.\tGCA\tG");
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod reference; // FASTA access and the 1-based sequence buffer
pub mod variant;   // VCF records and symbolic alleles
pub mod normalize; // Left-alignment
pub mod pipeline;  // Streaming record driver
pub mod util;      // File helpers

// Re-exports for convenience
pub use normalize::{left_align, standardize, Alignment, AlignmentError, AlignmentStatus, NormalizeError};
pub use pipeline::{MissingChromosome, PipelineConfig, PipelineError, RunSummary, VcfPipeline};
pub use reference::{
    FastaScanner, IndexedFasta, ReferenceError, ReferenceSequence, ReferenceSource, ReferenceStore,
};
pub use variant::{EventKind, SymbolicKind, VariantEvent};
