//! Streaming VCF normalization.
//!
//! Records are handled strictly one at a time: read, normalize, write. The
//! reference for the chromosome of the current run of records is held as a
//! single shared buffer and swapped when the chromosome changes.

mod config;

pub use config::{MissingChromosome, PipelineConfig};

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::normalize::{left_align, standardize, AlignmentStatus, NormalizeError};
use crate::reference::{ReferenceError, ReferenceSequence, ReferenceSource};
use crate::variant::{restore_symbolic, CoordinateKey, EventParseError, VariantEvent};

/// Errors that stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not valid UTF-8.
    #[error("line {line}: not valid UTF-8")]
    Encoding {
        /// 1-based input line number.
        line: usize,
    },

    /// A data line could not be parsed.
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based input line number.
        line: usize,
        /// Underlying parse error.
        #[source]
        source: EventParseError,
    },

    /// Expansion or alignment precondition failed.
    #[error("line {line}: {source}")]
    Normalize {
        /// 1-based input line number.
        line: usize,
        /// Underlying normalization error.
        #[source]
        source: NormalizeError,
    },

    /// The reference could not provide the record's chromosome.
    #[error("line {line}: {source}")]
    Reference {
        /// 1-based input line number.
        line: usize,
        /// Underlying reference error.
        #[source]
        source: ReferenceError,
    },
}

/// Counters describing a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    /// Header lines copied through.
    pub headers: usize,
    /// Data records written.
    pub written: usize,
    /// Indels moved left.
    pub shifted: usize,
    /// Indels already leftmost.
    pub unchanged: usize,
    /// Records that are not simple indels, written unchanged.
    pub unsupported: usize,
    /// Symbolic records expanded to literal alleles.
    pub expanded: usize,
    /// Records dropped because their chromosome is not in the reference.
    pub skipped_missing: usize,
    /// Records dropped because they failed expansion or alignment.
    pub skipped_invalid: usize,
    /// Records that sort before the record preceding them.
    pub out_of_order: usize,
}

/// Drives records from a VCF stream through expansion and left-alignment.
#[derive(Debug)]
pub struct VcfPipeline<S> {
    source: S,
    config: PipelineConfig,
    current: Option<Arc<ReferenceSequence>>,
    missing: HashSet<String>,
    last_key: Option<CoordinateKey>,
    summary: RunSummary,
}

impl<S: ReferenceSource> VcfPipeline<S> {
    /// Create a pipeline reading chromosomes from `source`.
    pub fn new(source: S, config: PipelineConfig) -> Self {
        Self {
            source,
            config,
            current: None,
            missing: HashSet::new(),
            last_key: None,
            summary: RunSummary::default(),
        }
    }

    /// Counters so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Process every line of `input`, writing results to `output`.
    ///
    /// Header lines are copied verbatim and blank lines skipped. On error the
    /// output is flushed first, so every record before the failing one is kept.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
    ) -> Result<RunSummary, PipelineError> {
        let mut buffer = Vec::new();
        let mut line_number = 0;
        loop {
            buffer.clear();
            if input.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;
            let line = match std::str::from_utf8(&buffer) {
                Ok(text) => text.trim_end_matches(['\n', '\r']),
                Err(_) => {
                    output.flush()?;
                    return Err(PipelineError::Encoding { line: line_number });
                }
            };

            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                writeln!(output, "{line}")?;
                self.summary.headers += 1;
                continue;
            }

            match self.process_record(line, line_number) {
                Ok(Some(record)) => {
                    writeln!(output, "{record}")?;
                    self.summary.written += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    output.flush()?;
                    return Err(err);
                }
            }
        }
        output.flush()?;

        info!(
            written = self.summary.written,
            shifted = self.summary.shifted,
            unsupported = self.summary.unsupported,
            skipped = self.summary.skipped_missing + self.summary.skipped_invalid,
            "normalization finished"
        );
        Ok(self.summary.clone())
    }

    /// Normalize a single data line. `Ok(None)` means the record is dropped.
    pub fn process_record(
        &mut self,
        line: &str,
        line_number: usize,
    ) -> Result<Option<String>, PipelineError> {
        let event = VariantEvent::parse(line).map_err(|source| PipelineError::Parse {
            line: line_number,
            source,
        })?;
        self.track_order(&event);

        let Some(reference) = self.reference_for(&event.chromosome, line_number)? else {
            self.summary.skipped_missing += 1;
            return Ok(None);
        };

        let aligned = match self.normalize(&event, &reference) {
            Ok(aligned) => aligned,
            Err(source) if self.config.skip_invalid => {
                warn!(line = line_number, error = %source, "skipping invalid record");
                self.summary.skipped_invalid += 1;
                return Ok(None);
            }
            Err(source) => {
                return Err(PipelineError::Normalize {
                    line: line_number,
                    source,
                })
            }
        };

        let output = if self.config.restore_symbolic {
            restore_symbolic(&aligned)
        } else {
            aligned
        };
        Ok(Some(output.to_line()))
    }

    fn normalize(
        &mut self,
        event: &VariantEvent,
        reference: &ReferenceSequence,
    ) -> Result<VariantEvent, NormalizeError> {
        let alignment = if self.config.expand_symbolic {
            standardize(event, reference)?
        } else {
            left_align(event, reference)?
        };
        if alignment.event.symbolic.is_some() {
            self.summary.expanded += 1;
        }

        match alignment.status {
            AlignmentStatus::Shifted { from } => {
                debug!(
                    event = %alignment.event,
                    from,
                    shifts = alignment.shifts,
                    "left-aligned"
                );
                self.summary.shifted += 1;
            }
            AlignmentStatus::Unchanged => self.summary.unchanged += 1,
            AlignmentStatus::Unsupported(kind) => {
                warn!(event = %alignment.event, %kind, "cannot left-align, writing unchanged");
                self.summary.unsupported += 1;
            }
        }
        Ok(alignment.event)
    }

    /// Sequence for `chromosome`, loading it if the chromosome changed.
    /// `Ok(None)` when the chromosome is missing and the policy is to skip.
    fn reference_for(
        &mut self,
        chromosome: &str,
        line_number: usize,
    ) -> Result<Option<Arc<ReferenceSequence>>, PipelineError> {
        if let Some(current) = &self.current {
            if current.name() == chromosome {
                return Ok(Some(Arc::clone(current)));
            }
        }
        if self.missing.contains(chromosome) {
            return Ok(None);
        }

        match self.source.fetch(chromosome) {
            Ok(sequence) => {
                self.current = Some(Arc::clone(&sequence));
                Ok(Some(sequence))
            }
            Err(ReferenceError::ChromosomeNotFound { name })
                if self.config.missing_chromosome == MissingChromosome::Skip =>
            {
                warn!(chromosome = %name, "chromosome not in reference, skipping its records");
                self.missing.insert(name);
                Ok(None)
            }
            Err(source) => Err(PipelineError::Reference {
                line: line_number,
                source,
            }),
        }
    }

    fn track_order(&mut self, event: &VariantEvent) {
        let key = event.key();
        if let Some(last) = &self.last_key {
            if key < *last {
                if self.summary.out_of_order == 0 {
                    warn!(
                        event = %event,
                        "input is not sorted; reference lookups may rescan the FASTA"
                    );
                }
                self.summary.out_of_order += 1;
            }
        }
        self.last_key = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceStore;

    fn store() -> ReferenceStore {
        let mut store = ReferenceStore::new();
        store.insert(ReferenceSequence::new("chr1", b"GCACACTTTTG"));
        store
    }

    fn run(input: &str, config: PipelineConfig) -> Result<(String, RunSummary), PipelineError> {
        let mut pipeline = VcfPipeline::new(store(), config);
        let mut output = Vec::new();
        let summary = pipeline.run(input.as_bytes(), &mut output)?;
        Ok((String::from_utf8(output).unwrap(), summary))
    }

    #[test]
    fn headers_copied_and_records_aligned() {
        let input = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\n\nchr1\t4\t.\tCAC\tC\n";
        let (output, summary) = run(input, PipelineConfig::standardize()).unwrap();
        assert_eq!(
            output,
            "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\nchr1\t1\t.\tGCA\tG\n"
        );
        assert_eq!(summary.headers, 2);
        assert_eq!(summary.shifted, 1);
    }

    #[test]
    fn missing_chromosome_skip_and_abort() {
        let input = "chr2\t5\t.\tA\tAT\nchr2\t6\t.\tA\tAT\nchr1\t2\t.\tC\tG\n";
        let (output, summary) = run(input, PipelineConfig::standardize()).unwrap();
        assert_eq!(output, "chr1\t2\t.\tC\tG\n");
        assert_eq!(summary.skipped_missing, 2);
        assert_eq!(summary.unsupported, 1);

        let config = PipelineConfig::standardize().with_missing_chromosome(MissingChromosome::Abort);
        let err = run(input, config).unwrap_err();
        assert!(matches!(err, PipelineError::Reference { line: 1, .. }));
    }

    #[test]
    fn mismatch_aborts_unless_skipping() {
        let input = "chr1\t2\t.\tC\tCA\nchr1\t3\t.\tG\tGA\nchr1\t8\t.\tT\tTA\n";
        let err = run(input, PipelineConfig::standardize()).unwrap_err();
        assert!(matches!(err, PipelineError::Normalize { line: 2, .. }));

        let (output, summary) =
            run(input, PipelineConfig::standardize().with_skip_invalid(true)).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert_eq!(summary.skipped_invalid, 1);
    }

    #[test]
    fn earlier_records_survive_a_fatal_error() {
        let input = "chr1\t2\t.\tC\tCA\nchr1\t3\t.\tT\t<DUP>\n";
        let mut pipeline = VcfPipeline::new(store(), PipelineConfig::standardize());
        let mut output = Vec::new();
        let err = pipeline.run(input.as_bytes(), &mut output).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Normalize {
                source: NormalizeError::Symbolic(_),
                ..
            }
        ));
        assert_eq!(String::from_utf8(output).unwrap(), "chr1\t2\t.\tC\tCA\n");
    }

    #[test]
    fn out_of_order_records_are_counted() {
        let input = "chr1\t6\t.\tC\tG\nchr1\t2\t.\tC\tG\n";
        let (_, summary) = run(input, PipelineConfig::standardize()).unwrap();
        assert_eq!(summary.out_of_order, 1);
    }

    #[test]
    fn unsupported_records_are_written_byte_for_byte() {
        let input = "chr1\t2\trs1\tc\tg\t.\tPASS\t.\nchr1\t3\trs2\tac\tgt\t.\tPASS\t.\nchr1\t4\trs3\tc\tt,a\t.\tPASS\t.\n";
        let (output, summary) = run(input, PipelineConfig::standardize()).unwrap();
        assert_eq!(output, input);
        assert_eq!(summary.unsupported, 3);
    }

    #[test]
    fn lowercase_indel_that_moves_is_written_upper_case() {
        let input = "chr1\t4\t.\tcac\tc\n";
        let (output, _) = run(input, PipelineConfig::standardize()).unwrap();
        assert_eq!(output, "chr1\t1\t.\tGCA\tG\n");
    }

    #[test]
    fn symbolic_records_pass_through_without_expansion() {
        let input = "chr1\t8\tsv1\tT\t<INS>\t.\tPASS\tSVTYPE=INS;SEQ=TT\nchr1\t3\tsv2\tA\t<DUP>\t.\tPASS\t.\n";
        let config = PipelineConfig::standardize().with_expand_symbolic(false);
        let (output, summary) = run(input, config).unwrap();
        assert_eq!(output, input);
        assert_eq!(summary.unsupported, 2);
        assert_eq!(summary.expanded, 0);

        let first_record = input.lines().next().unwrap();
        let (expanded, summary) =
            run(&format!("{first_record}\n"), PipelineConfig::standardize()).unwrap();
        assert_eq!(expanded, "chr1\t6\tsv1\tC\tCTT\t.\tPASS\tSVTYPE=INS;SEQ=TT\n");
        assert_eq!(summary.expanded, 1);
    }

    #[test]
    fn invalid_utf8_reports_its_line() {
        let mut input = b"chr1\t4\t.\tCAC\tC\n".to_vec();
        input.extend_from_slice(b"chr1\t2\t.\tC\tG\t.\tPASS\tNOTE=\xff\n");
        let mut pipeline = VcfPipeline::new(store(), PipelineConfig::standardize());
        let mut output = Vec::new();
        let err = pipeline.run(&input[..], &mut output).unwrap_err();
        assert!(matches!(err, PipelineError::Encoding { line: 2 }));
        assert_eq!(String::from_utf8(output).unwrap(), "chr1\t1\t.\tGCA\tG\n");
    }
}
