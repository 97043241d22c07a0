use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::{header_name, ReferenceError, ReferenceSequence, ReferenceSource, SENTINEL};
use crate::util::open_reader;

/// Whole reference genome held in memory, keyed by chromosome name.
///
/// Lookups never touch the file again, so VCF and FASTA ordering are
/// irrelevant and a missing chromosome is simply an absent key.
#[derive(Debug, Default, Clone)]
pub struct ReferenceStore {
    sequences: HashMap<String, Arc<ReferenceSequence>>,
    order: Vec<String>,
}

impl ReferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every chromosome of a FASTA file (gzip allowed).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let reader = open_reader(path.as_ref())?;
        let store = Self::from_reader(reader)?;
        info!(
            path = %path.as_ref().display(),
            chromosomes = store.len(),
            "preloaded reference"
        );
        Ok(store)
    }

    /// Read every chromosome from a FASTA stream.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, ReferenceError> {
        let mut store = Self::new();
        let mut current: Option<(String, Vec<u8>)> = None;
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if line.first() == Some(&b'>') {
                if let Some((name, bases)) = current.take() {
                    store.insert_buffer(name, bases);
                }
                match header_name(&String::from_utf8_lossy(&line)) {
                    Some(name) => current = Some((name.to_string(), vec![SENTINEL])),
                    None => warn!("skipping FASTA header without a name"),
                }
            } else if let Some((_, bases)) = current.as_mut() {
                bases.extend(
                    line.iter()
                        .filter(|b| !b.is_ascii_whitespace())
                        .map(u8::to_ascii_uppercase),
                );
            }
        }
        if let Some((name, bases)) = current.take() {
            store.insert_buffer(name, bases);
        }

        Ok(store)
    }

    fn insert_buffer(&mut self, name: String, bases: Vec<u8>) {
        if self.sequences.contains_key(&name) {
            warn!(chromosome = %name, "duplicate FASTA header, keeping first occurrence");
            return;
        }
        let sequence = ReferenceSequence::from_sentinel_buffer(name.as_str(), bases);
        self.order.push(name.clone());
        self.sequences.insert(name, Arc::new(sequence));
    }

    /// Add a sequence built elsewhere. Returns `false` if the name was taken.
    pub fn insert(&mut self, sequence: ReferenceSequence) -> bool {
        if self.sequences.contains_key(sequence.name()) {
            return false;
        }
        let name = sequence.name().to_string();
        self.order.push(name.clone());
        self.sequences.insert(name, Arc::new(sequence));
        true
    }

    /// Look up a chromosome without going through the trait.
    pub fn get(&self, chromosome: &str) -> Option<Arc<ReferenceSequence>> {
        self.sequences.get(chromosome).cloned()
    }

    /// Chromosome names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of chromosomes held.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether the store holds no chromosomes.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl ReferenceSource for ReferenceStore {
    fn fetch(&mut self, chromosome: &str) -> Result<Arc<ReferenceSequence>, ReferenceError> {
        self.get(chromosome)
            .ok_or_else(|| ReferenceError::ChromosomeNotFound {
                name: chromosome.to_string(),
            })
    }
}
