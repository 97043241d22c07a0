use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CoordinateKey, SymbolicKind};

/// Column holding the chromosome name.
pub const CHROM_COLUMN: usize = 0;
/// Column holding the 1-based position.
pub const POS_COLUMN: usize = 1;
/// Column holding the reference allele.
pub const REF_COLUMN: usize = 3;
/// Column holding the alternate allele(s).
pub const ALT_COLUMN: usize = 4;
/// Column holding the INFO field.
pub const INFO_COLUMN: usize = 7;

const MIN_COLUMNS: usize = ALT_COLUMN + 1;

/// Errors raised while turning a VCF data line into a [`VariantEvent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventParseError {
    /// Fewer tab-separated columns than CHROM..ALT.
    #[error("expected at least 5 tab-separated columns, found {found}")]
    MissingColumns {
        /// Number of columns present.
        found: usize,
    },

    /// POS is not a positive integer.
    #[error("invalid position '{value}'")]
    InvalidPosition {
        /// Offending text.
        value: String,
    },

    /// REF or ALT column is empty.
    #[error("empty allele in column {column}")]
    EmptyAllele {
        /// 0-based column index.
        column: usize,
    },
}

/// Shape of a variant as far as left-alignment is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    /// Single base replaced by a single base.
    Substitution,
    /// One anchor base followed by inserted bases.
    Insertion,
    /// Anchor base plus deleted bases replaced by the anchor alone.
    Deletion,
    /// Several comma-separated alternates.
    MultiAllelic,
    /// Multi-base replacement.
    Complex,
    /// Alternate is an unexpanded `<...>` tag.
    Symbolic,
}

impl EventKind {
    /// Whether left-alignment applies.
    pub fn is_indel(self) -> bool {
        matches!(self, EventKind::Insertion | EventKind::Deletion)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventKind::Substitution => "substitution",
            EventKind::Insertion => "insertion",
            EventKind::Deletion => "deletion",
            EventKind::MultiAllelic => "multi-allelic",
            EventKind::Complex => "complex replacement",
            EventKind::Symbolic => "symbolic",
        };
        f.write_str(label)
    }
}

/// One VCF data line: the four fields the normalizer works on plus every
/// original column for lossless output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantEvent {
    /// Chromosome name (column 0).
    pub chromosome: String,
    /// 1-based position (column 1).
    pub position: u32,
    /// Reference allele, upper-cased (column 3).
    pub reference_allele: String,
    /// Alternate allele(s), upper-cased (column 4).
    pub alternate_allele: String,
    /// All tab-separated columns as read.
    pub raw_fields: Vec<String>,
    /// Symbolic encoding the record arrived in, if any.
    pub symbolic: Option<SymbolicKind>,
}

impl VariantEvent {
    /// Parse a tab-separated VCF data line.
    pub fn parse(line: &str) -> Result<Self, EventParseError> {
        let raw_fields: Vec<String> = line
            .trim_end_matches(['\n', '\r'])
            .split('\t')
            .map(str::to_string)
            .collect();
        if raw_fields.len() < MIN_COLUMNS {
            return Err(EventParseError::MissingColumns {
                found: raw_fields.len(),
            });
        }

        let position_text = raw_fields[POS_COLUMN].trim();
        let position = position_text
            .parse::<u32>()
            .ok()
            .filter(|&p| p > 0)
            .ok_or_else(|| EventParseError::InvalidPosition {
                value: position_text.to_string(),
            })?;

        let allele = |column: usize| {
            let value = raw_fields[column].trim();
            if value.is_empty() {
                Err(EventParseError::EmptyAllele { column })
            } else {
                Ok(value.to_ascii_uppercase())
            }
        };
        let reference_allele = allele(REF_COLUMN)?;
        let alternate_allele = allele(ALT_COLUMN)?;

        Ok(Self {
            chromosome: raw_fields[CHROM_COLUMN].clone(),
            position,
            reference_allele,
            alternate_allele,
            raw_fields,
            symbolic: None,
        })
    }

    /// Copy of this event with new coordinates and alleles; everything else kept.
    pub fn with_alleles(
        &self,
        position: u32,
        reference_allele: impl Into<String>,
        alternate_allele: impl Into<String>,
    ) -> Self {
        Self {
            chromosome: self.chromosome.clone(),
            position,
            reference_allele: reference_allele.into(),
            alternate_allele: alternate_allele.into(),
            raw_fields: self.raw_fields.clone(),
            symbolic: self.symbolic,
        }
    }

    /// Classify the event.
    pub fn kind(&self) -> EventKind {
        let ref_len = self.reference_allele.len();
        let alt_len = self.alternate_allele.len();
        let multi = self.alternate_allele.contains(',');

        if self.alternate_allele.starts_with('<') && self.alternate_allele.ends_with('>') {
            EventKind::Symbolic
        } else if ref_len == 1 && alt_len > 1 && !multi {
            EventKind::Insertion
        } else if ref_len > 1 && alt_len == 1 {
            EventKind::Deletion
        } else if ref_len == 1 && alt_len == 1 {
            EventKind::Substitution
        } else if multi {
            EventKind::MultiAllelic
        } else {
            EventKind::Complex
        }
    }

    /// Sort key of the event.
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::new(&self.chromosome, self.position)
    }

    /// INFO column, if the record has one.
    pub fn info(&self) -> Option<&str> {
        self.raw_fields.get(INFO_COLUMN).map(String::as_str)
    }

    /// Serialize back to a VCF line (no trailing newline).
    ///
    /// Columns other than POS, REF and ALT are copied verbatim. A record that
    /// did not move keeps its allele text exactly as read (case included)
    /// unless the alleles themselves changed; a moved record is written with
    /// the upper-case alleles it was aligned with.
    pub fn to_line(&self) -> String {
        let mut fields = self.raw_fields.clone();
        let moved = fields[POS_COLUMN].trim().parse::<u32>().ok() != Some(self.position);
        if moved {
            fields[POS_COLUMN] = self.position.to_string();
        }
        replace_allele(&mut fields[REF_COLUMN], &self.reference_allele, moved);
        replace_allele(&mut fields[ALT_COLUMN], &self.alternate_allele, moved);
        fields.join("\t")
    }
}

fn replace_allele(field: &mut String, allele: &str, force: bool) {
    if force || !field.trim().eq_ignore_ascii_case(allele) {
        *field = allele.to_string();
    }
}

impl fmt::Display for VariantEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chromosome, self.position, self.reference_allele, self.alternate_allele
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(reference: &str, alternate: &str) -> VariantEvent {
        VariantEvent::parse(&format!("chr1\t10\t.\t{reference}\t{alternate}\t50\tPASS\t.")).unwrap()
    }

    #[test]
    fn parses_core_columns() {
        let e = VariantEvent::parse("chr7\t1234\trs1\tac\tA\t.\tPASS\tDP=4\tGT\t0/1\n").unwrap();
        assert_eq!(e.chromosome, "chr7");
        assert_eq!(e.position, 1234);
        assert_eq!(e.reference_allele, "AC");
        assert_eq!(e.alternate_allele, "A");
        assert_eq!(e.raw_fields.len(), 10);
        assert_eq!(e.info(), Some("DP=4"));
    }

    #[test]
    fn classifies_shapes() {
        assert_eq!(event("A", "AT").kind(), EventKind::Insertion);
        assert_eq!(event("AT", "A").kind(), EventKind::Deletion);
        assert_eq!(event("A", "G").kind(), EventKind::Substitution);
        assert_eq!(event("A", "AT,AG").kind(), EventKind::MultiAllelic);
        assert_eq!(event("AT", "GC").kind(), EventKind::Complex);
        assert_eq!(event("T", "<INS>").kind(), EventKind::Symbolic);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            VariantEvent::parse("chr1\t10\t.\tA"),
            Err(EventParseError::MissingColumns { found: 4 })
        );
        assert_eq!(
            VariantEvent::parse("chr1\t0\t.\tA\tT"),
            Err(EventParseError::InvalidPosition { value: "0".into() })
        );
        assert_eq!(
            VariantEvent::parse("chr1\tten\t.\tA\tT"),
            Err(EventParseError::InvalidPosition { value: "ten".into() })
        );
        assert_eq!(
            VariantEvent::parse("chr1\t10\t.\t\tT"),
            Err(EventParseError::EmptyAllele { column: REF_COLUMN })
        );
    }

    #[test]
    fn to_line_only_touches_pos_ref_alt() {
        let e = VariantEvent::parse("chr1\t10\tid7\tAT\tA\t33\tPASS\tSVTYPE=DEL\tGT\t1/1").unwrap();
        let moved = e.with_alleles(8, "TA", "T");
        assert_eq!(moved.to_line(), "chr1\t8\tid7\tTA\tT\t33\tPASS\tSVTYPE=DEL\tGT\t1/1");
    }

    #[test]
    fn untouched_alleles_keep_their_case() {
        let line = "chr1\t10\trs1\tca\tgt\t.\tPASS\t.";
        let e = VariantEvent::parse(line).unwrap();
        assert_eq!(e.reference_allele, "CA");
        assert_eq!(e.to_line(), line);

        let expanded = e.with_alleles(10, "CA", "GTT");
        assert_eq!(expanded.to_line(), "chr1\t10\trs1\tca\tGTT\t.\tPASS\t.");

        let moved = e.with_alleles(9, "CA", "GT");
        assert_eq!(moved.to_line(), "chr1\t9\trs1\tCA\tGT\t.\tPASS\t.");
    }
}
