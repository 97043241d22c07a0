use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_htslib::faidx;
use tracing::info;

use super::{ReferenceError, ReferenceSequence, ReferenceSource};

/// FASTA with a samtools `.fai` index, read through htslib.
///
/// Each lookup reads exactly one chromosome from disk, so file order does not
/// matter and nothing besides the requested chromosome is held in memory.
pub struct IndexedFasta {
    reader: faidx::Reader,
    names: HashSet<String>,
    path: PathBuf,
}

impl fmt::Debug for IndexedFasta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedFasta")
            .field("path", &self.path)
            .field("sequences", &self.names.len())
            .finish()
    }
}

impl IndexedFasta {
    /// Path of the index htslib expects next to `fasta`.
    pub fn index_path(fasta: &Path) -> PathBuf {
        let mut name = fasta.as_os_str().to_owned();
        name.push(".fai");
        PathBuf::from(name)
    }

    /// Whether `fasta` has an index alongside it.
    pub fn has_index(fasta: &Path) -> bool {
        Self::index_path(fasta).is_file()
    }

    /// Open an indexed FASTA file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let reader =
            faidx::Reader::from_path(path).map_err(|e| ReferenceError::Index(e.to_string()))?;

        let mut names = HashSet::new();
        for i in 0..reader.n_seqs() {
            let name = reader
                .seq_name(i as i32)
                .map_err(|e| ReferenceError::Index(e.to_string()))?;
            names.insert(name);
        }

        Ok(Self {
            reader,
            names,
            path: path.to_path_buf(),
        })
    }

    /// Whether the index lists `chromosome`.
    pub fn contains(&self, chromosome: &str) -> bool {
        self.names.contains(chromosome)
    }
}

impl ReferenceSource for IndexedFasta {
    fn fetch(&mut self, chromosome: &str) -> Result<Arc<ReferenceSequence>, ReferenceError> {
        if !self.contains(chromosome) {
            return Err(ReferenceError::ChromosomeNotFound {
                name: chromosome.to_string(),
            });
        }

        let length = self.reader.fetch_seq_len(chromosome) as usize;
        if length == 0 {
            return Ok(Arc::new(ReferenceSequence::new(chromosome, b"")));
        }

        // faidx coordinates are 0-based with an inclusive end.
        let bases = self
            .reader
            .fetch_seq_string(chromosome, 0, length - 1)
            .map_err(|e| ReferenceError::Index(e.to_string()))?;

        info!(chromosome, bases = length, "loaded indexed reference chromosome");
        Ok(Arc::new(ReferenceSequence::new(chromosome, bases.as_bytes())))
    }
}
