//! Left-alignment of indels.
//!
//! An insertion or deletion inside a repeat can be written at several
//! positions that all describe the same edited sequence:
//!
//! ```text
//! reference            G C A C A C T
//! POS 4  REF CAC ALT C  G C A C[A C]T
//! POS 1  REF GCA ALT G  G[C A]C A C T
//! ```
//!
//! The canonical form is the leftmost one. [`left_align`] walks the event
//! left one base at a time while the base leaving the event on the right is
//! identical to the base entering it on the left, stopping at the first
//! non-redundant anchor or at position 1.
//!
//! Everything here is pure: they return a new event and never touch the
//! reference.

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::reference::ReferenceSequence;
use crate::variant::{expand_symbolic, EventKind, SymbolicError, VariantEvent};

/// Precondition failures of left-alignment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    /// REF does not start with the reference base at POS; VCF and FASTA
    /// disagree.
    #[error(
        "reference base at {chromosome}:{position} is '{found}' but the record's reference allele starts with '{expected}'"
    )]
    ReferenceMismatch {
        /// Chromosome name.
        chromosome: String,
        /// 1-based position.
        position: u32,
        /// First base of the REF allele.
        expected: char,
        /// Base in the reference sequence.
        found: char,
    },

    /// POS lies beyond the end of the chromosome.
    #[error("position {chromosome}:{position} lies outside the chromosome (length {length})")]
    PositionOutOfRange {
        /// Chromosome name.
        chromosome: String,
        /// 1-based position.
        position: u32,
        /// Number of bases in the chromosome.
        length: usize,
    },
}

/// Any failure on the way from a raw record to its aligned form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Symbolic allele could not be expanded.
    #[error(transparent)]
    Symbolic(#[from] SymbolicError),
    /// Alignment precondition violated.
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// What left-alignment did to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlignmentStatus {
    /// Indel was already leftmost.
    Unchanged,
    /// Indel moved left from `from`.
    Shifted {
        /// Original position.
        from: u32,
    },
    /// Not an insertion or deletion; passed through as is.
    Unsupported(EventKind),
}

/// Result of [`left_align`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// The event at its leftmost equivalent position.
    pub event: VariantEvent,
    /// Number of single-base steps taken.
    pub shifts: u32,
    /// Summary of the outcome.
    pub status: AlignmentStatus,
}

impl Alignment {
    fn passthrough(event: &VariantEvent, kind: EventKind) -> Self {
        Self {
            event: event.clone(),
            shifts: 0,
            status: AlignmentStatus::Unsupported(kind),
        }
    }

    fn shifted(original: &VariantEvent, event: VariantEvent, shifts: u32) -> Self {
        let status = if shifts == 0 {
            AlignmentStatus::Unchanged
        } else {
            AlignmentStatus::Shifted {
                from: original.position,
            }
        };
        Self {
            event,
            shifts,
            status,
        }
    }
}

/// Move an insertion or deletion to its leftmost equivalent position.
///
/// Substitutions, multi-allelic and complex records are returned unchanged
/// with [`AlignmentStatus::Unsupported`].
pub fn left_align(
    event: &VariantEvent,
    reference: &ReferenceSequence,
) -> Result<Alignment, AlignmentError> {
    let kind = event.kind();
    if !kind.is_indel() {
        return Ok(Alignment::passthrough(event, kind));
    }

    let found = reference
        .base(event.position)
        .ok_or_else(|| AlignmentError::PositionOutOfRange {
            chromosome: event.chromosome.clone(),
            position: event.position,
            length: reference.len(),
        })?;
    let expected = event.reference_allele.as_bytes()[0];
    if expected != found {
        return Err(AlignmentError::ReferenceMismatch {
            chromosome: event.chromosome.clone(),
            position: event.position,
            expected: char::from(expected),
            found: char::from(found),
        });
    }

    let aligned = match kind {
        EventKind::Insertion => align_insertion(event, reference),
        _ => align_deletion(event, reference),
    };
    Ok(aligned)
}

fn align_insertion(event: &VariantEvent, reference: &ReferenceSequence) -> Alignment {
    let mut position = event.position;
    let mut anchor = event.reference_allele.as_bytes()[0];
    let mut alternate: VecDeque<u8> = event.alternate_allele.bytes().collect();
    let mut shifts = 0;

    while alternate.back() == Some(&anchor) && position > 1 {
        let Some(base) = reference.base(position - 1) else {
            break;
        };
        position -= 1;
        anchor = base;
        alternate.pop_back();
        alternate.push_front(anchor);
        shifts += 1;
        debug!(chromosome = %event.chromosome, position, "shifting insertion");
    }

    let aligned = event.with_alleles(
        position,
        char::from(anchor).to_string(),
        bytes_to_string(alternate),
    );
    Alignment::shifted(event, aligned, shifts)
}

fn align_deletion(event: &VariantEvent, reference: &ReferenceSequence) -> Alignment {
    let event_length = (event.reference_allele.len() - event.alternate_allele.len()) as u32;
    let mut position = event.position;
    let mut anchor = event.reference_allele.as_bytes()[0];
    let mut deleted: VecDeque<u8> = event.reference_allele.bytes().collect();
    let mut shifts = 0;

    // A deletion running off the chromosome end has no base to compare and stays put.
    while reference.base(position + event_length) == Some(anchor) && position > 1 {
        let Some(base) = reference.base(position - 1) else {
            break;
        };
        position -= 1;
        anchor = base;
        deleted.pop_back();
        deleted.push_front(anchor);
        shifts += 1;
        debug!(chromosome = %event.chromosome, position, "shifting deletion");
    }

    let aligned = event.with_alleles(
        position,
        bytes_to_string(deleted),
        char::from(anchor).to_string(),
    );
    Alignment::shifted(event, aligned, shifts)
}

fn bytes_to_string(bases: VecDeque<u8>) -> String {
    bases.into_iter().map(char::from).collect()
}

/// Expand a symbolic allele if present, then left-align.
pub fn standardize(
    event: &VariantEvent,
    reference: &ReferenceSequence,
) -> Result<Alignment, NormalizeError> {
    let expanded = expand_symbolic(event, reference)?;
    Ok(left_align(&expanded, reference)?)
}
