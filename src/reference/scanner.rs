use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::{header_matches, ReferenceError, ReferenceSequence, ReferenceSource, SENTINEL};

/// Sequential FASTA reader that keeps its place between lookups.
///
/// After loading a chromosome the cursor is left at the start of the next
/// header, so a VCF sorted in the same order as the FASTA is served by a single
/// pass over the file. A request for a chromosome that lies behind the cursor
/// triggers one restart from the beginning of the file.
#[derive(Debug)]
pub struct FastaScanner<R> {
    reader: R,
    start: u64,
    offset: u64,
    restarts: usize,
}

impl FastaScanner<BufReader<File>> {
    /// Open a plain (uncompressed) FASTA file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead + Seek> FastaScanner<R> {
    /// Wrap a positionable reader. Its current position is treated as the
    /// top of the file for restarts.
    pub fn new(mut reader: R) -> Result<Self, ReferenceError> {
        let start = reader.stream_position()?;
        Ok(Self {
            reader,
            start,
            offset: start,
            restarts: 0,
        })
    }

    /// Number of times a lookup had to restart from the top of the file.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// Scan forward from the cursor for `chromosome`.
    ///
    /// On success the cursor is rewound to the start of the header that ended
    /// the chromosome (or sits at EOF). Lines are handled as raw bytes.
    fn scan_forward(&mut self, chromosome: &str) -> Result<Option<Vec<u8>>, ReferenceError> {
        let mut line = Vec::new();
        let mut collected: Option<Vec<u8>> = None;

        loop {
            let line_start = self.offset;
            line.clear();
            let read = self.reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                return Ok(collected);
            }
            self.offset += read as u64;

            if line.first() == Some(&b'>') {
                if collected.is_some() {
                    self.reader.seek(SeekFrom::Start(line_start))?;
                    self.offset = line_start;
                    return Ok(collected);
                }
                if header_matches(&String::from_utf8_lossy(&line), chromosome) {
                    debug!(chromosome, offset = line_start, "found reference header");
                    collected = Some(vec![SENTINEL]);
                }
            } else if let Some(bases) = collected.as_mut() {
                bases.extend(
                    line.iter()
                        .filter(|b| !b.is_ascii_whitespace())
                        .map(u8::to_ascii_uppercase),
                );
            }
        }
    }

    fn rewind(&mut self) -> Result<(), ReferenceError> {
        self.reader.seek(SeekFrom::Start(self.start))?;
        self.offset = self.start;
        self.restarts += 1;
        Ok(())
    }
}

impl<R: BufRead + Seek> ReferenceSource for FastaScanner<R> {
    fn fetch(&mut self, chromosome: &str) -> Result<Arc<ReferenceSequence>, ReferenceError> {
        let started_at_top = self.offset == self.start;
        let mut found = self.scan_forward(chromosome)?;

        if found.is_none() && !started_at_top {
            debug!(chromosome, "reached end of reference, restarting scan");
            self.rewind()?;
            found = self.scan_forward(chromosome)?;
        }

        match found {
            Some(bases) => {
                info!(chromosome, bases = bases.len() - 1, "loaded reference chromosome");
                Ok(Arc::new(ReferenceSequence::from_sentinel_buffer(
                    chromosome, bases,
                )))
            }
            None => Err(ReferenceError::ChromosomeNotFound {
                name: chromosome.to_string(),
            }),
        }
    }
}
