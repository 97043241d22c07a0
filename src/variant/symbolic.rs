//! PacBio-style symbolic alleles.
//!
//! Some structural-variant callers write large indels as a single anchor base
//! plus a tag instead of literal sequence:
//!
//! ```text
//! chr1  100  .  T  <INS>  .  PASS  SVTYPE=INS;SVLEN=4;SEQ=ACGT
//! chr1  200  .  G  <DEL>  .  PASS  SVTYPE=DEL;SVLEN=-3
//! ```
//!
//! Left-alignment needs literal alleles, so these are expanded first
//! (`T -> TACGT`, `GCAT -> G`) and may be folded back afterwards.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EventKind, VariantEvent, INFO_COLUMN};
use crate::reference::ReferenceSequence;

/// Alternate allele marking a symbolic insertion.
pub const INSERTION_TAG: &str = "<INS>";
/// Alternate allele marking a symbolic deletion.
pub const DELETION_TAG: &str = "<DEL>";

const SEQUENCE_KEY: &str = "SEQ";
const LENGTH_KEY: &str = "SVLEN";

/// Which symbolic tag a record was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolicKind {
    /// `<INS>` with inserted bases in `SEQ=`.
    Insertion,
    /// `<DEL>` with the deleted length in `SVLEN=`.
    Deletion,
}

impl fmt::Display for SymbolicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicKind::Insertion => f.write_str(INSERTION_TAG),
            SymbolicKind::Deletion => f.write_str(DELETION_TAG),
        }
    }
}

/// Errors raised while expanding a symbolic allele.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolicError {
    /// Tag other than `<INS>` / `<DEL>`.
    #[error("event type {tag} is unknown")]
    UnknownTag {
        /// The unrecognised alternate allele.
        tag: String,
    },

    /// INFO lacks the key the tag depends on.
    #[error("{tag} record has no {key}= entry in INFO")]
    MissingTag {
        /// Symbolic tag of the record.
        tag: SymbolicKind,
        /// Missing INFO key.
        key: &'static str,
    },

    /// `SEQ=` holds no A/C/G/T bases.
    #[error("SEQ= of <INS> record contains no valid bases")]
    EmptyInsertion,

    /// `SVLEN=` is not a positive length.
    #[error("invalid SVLEN '{value}'")]
    InvalidLength {
        /// Text after `SVLEN=`.
        value: String,
    },

    /// Deleted bases run past the end of the chromosome.
    #[error("deletion of {length} bases at {chromosome}:{position} runs past chromosome end ({chromosome_length})")]
    DeletionOutOfRange {
        /// Chromosome name.
        chromosome: String,
        /// Anchor position.
        position: u32,
        /// Deleted length.
        length: u32,
        /// Number of bases in the chromosome.
        chromosome_length: usize,
    },
}

/// Value of `key` in a semicolon-separated INFO column.
fn info_value<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    info.split(';').find_map(|entry| {
        entry
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

fn is_dna_base(base: char) -> bool {
    matches!(base.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T')
}

/// Leading run of A/C/G/T in `value`, upper-cased.
fn inserted_bases(value: &str) -> String {
    value
        .chars()
        .take_while(|&c| is_dna_base(c))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Absolute deletion length from an `SVLEN` value such as `-120` or `45`.
fn deletion_length(value: &str) -> Result<u32, SymbolicError> {
    let unsigned = value.trim_start_matches(['-', '+']);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..digits_end]
        .parse::<u32>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| SymbolicError::InvalidLength {
            value: value.to_string(),
        })
}

/// Symbolic kind of an alternate allele, `Ok(None)` for literal alleles.
pub fn symbolic_kind(alternate_allele: &str) -> Result<Option<SymbolicKind>, SymbolicError> {
    match alternate_allele {
        INSERTION_TAG => Ok(Some(SymbolicKind::Insertion)),
        DELETION_TAG => Ok(Some(SymbolicKind::Deletion)),
        tag if tag.starts_with('<') && tag.ends_with('>') => Err(SymbolicError::UnknownTag {
            tag: tag.to_string(),
        }),
        _ => Ok(None),
    }
}

/// Replace a symbolic alternate allele by literal bases.
///
/// Literal records come back unchanged. The returned event remembers its
/// original encoding in [`VariantEvent::symbolic`].
pub fn expand_symbolic(
    event: &VariantEvent,
    reference: &ReferenceSequence,
) -> Result<VariantEvent, SymbolicError> {
    let Some(kind) = symbolic_kind(&event.alternate_allele)? else {
        return Ok(event.clone());
    };
    let info = event.info().unwrap_or("");
    let anchor = event.reference_allele.get(..1).unwrap_or("N");

    let mut expanded = match kind {
        SymbolicKind::Insertion => {
            let value = info_value(info, SEQUENCE_KEY).ok_or(SymbolicError::MissingTag {
                tag: kind,
                key: SEQUENCE_KEY,
            })?;
            let bases = inserted_bases(value);
            if bases.is_empty() {
                return Err(SymbolicError::EmptyInsertion);
            }
            event.with_alleles(
                event.position,
                event.reference_allele.clone(),
                format!("{anchor}{bases}"),
            )
        }
        SymbolicKind::Deletion => {
            let value = info_value(info, LENGTH_KEY).ok_or(SymbolicError::MissingTag {
                tag: kind,
                key: LENGTH_KEY,
            })?;
            let length = deletion_length(value)?;
            let out_of_range = || SymbolicError::DeletionOutOfRange {
                chromosome: event.chromosome.clone(),
                position: event.position,
                length,
                chromosome_length: reference.len(),
            };
            let last = event.position.checked_add(length).ok_or_else(out_of_range)?;
            let deleted = reference
                .slice(event.position + 1, last)
                .ok_or_else(out_of_range)?;
            let mut reference_allele = String::with_capacity(deleted.len() + 1);
            reference_allele.push_str(anchor);
            reference_allele.extend(deleted.iter().map(|&b| char::from(b)));
            event.with_alleles(event.position, reference_allele, anchor)
        }
    };

    expanded.symbolic = Some(kind);
    Ok(expanded)
}

/// Fold an expanded (and possibly shifted) indel back into symbolic form.
///
/// Deletions become `anchor <DEL>`. Insertions become `anchor <INS>` with
/// `SEQ=` rewritten to the current inserted bases, which change when the
/// insertion was shifted through a repeat. Events that did not arrive
/// symbolic, or are no longer indels, are returned unchanged.
pub fn restore_symbolic(event: &VariantEvent) -> VariantEvent {
    if event.symbolic.is_none() {
        return event.clone();
    }

    match event.kind() {
        EventKind::Deletion => {
            event.with_alleles(event.position, event.alternate_allele.clone(), DELETION_TAG)
        }
        EventKind::Insertion => {
            let mut restored = event.with_alleles(
                event.position,
                event.reference_allele.clone(),
                INSERTION_TAG,
            );
            let inserted = event.alternate_allele.get(1..).unwrap_or("");
            if let Some(info) = restored.raw_fields.get_mut(INFO_COLUMN) {
                *info = rewrite_info_value(info, SEQUENCE_KEY, inserted);
            }
            restored
        }
        _ => event.clone(),
    }
}

/// Replace the value of `key` in an INFO column, leaving other entries alone.
fn rewrite_info_value(info: &str, key: &str, value: &str) -> String {
    info.split(';')
        .map(|entry| match entry.strip_prefix(key) {
            Some(rest) if rest.starts_with('=') => format!("{key}={value}"),
            _ => entry.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}
