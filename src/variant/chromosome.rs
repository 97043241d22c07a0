use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sort rank of a chromosome name: autosomes 1..22, then X, Y, M.
///
/// Names are accepted with or without the `chr` prefix. Anything that is not
/// a recognised human chromosome ranks after all of them and is ordered by
/// name among itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChromosomeIndex {
    /// Recognised chromosome with its numeric rank.
    Known(u32),
    /// Contig outside the standard set (e.g. `chrUn_gl000220`).
    Other(String),
}

/// Rank of `chrX`.
pub const CHR_X: u32 = 100;
/// Rank of `chrY`.
pub const CHR_Y: u32 = 101;
/// Rank of `chrM` / `MT`.
pub const CHR_M: u32 = 102;

impl ChromosomeIndex {
    /// Rank a chromosome name.
    pub fn from_name(name: &str) -> Self {
        let id = name.strip_prefix("chr").unwrap_or(name);
        let known = match id {
            "X" => Some(CHR_X),
            "Y" => Some(CHR_Y),
            "M" | "MT" => Some(CHR_M),
            _ => id.parse::<u32>().ok().filter(|n| (1..=22).contains(n)),
        };
        match known {
            Some(rank) => ChromosomeIndex::Known(rank),
            None => ChromosomeIndex::Other(name.to_string()),
        }
    }

    /// Numeric rank, if the chromosome is a recognised one.
    pub fn rank(&self) -> Option<u32> {
        match self {
            ChromosomeIndex::Known(rank) => Some(*rank),
            ChromosomeIndex::Other(_) => None,
        }
    }
}

impl Ord for ChromosomeIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ChromosomeIndex::Known(a), ChromosomeIndex::Known(b)) => a.cmp(b),
            (ChromosomeIndex::Known(_), ChromosomeIndex::Other(_)) => Ordering::Less,
            (ChromosomeIndex::Other(_), ChromosomeIndex::Known(_)) => Ordering::Greater,
            (ChromosomeIndex::Other(a), ChromosomeIndex::Other(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ChromosomeIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ChromosomeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChromosomeIndex::Known(rank) => write!(f, "{rank}"),
            ChromosomeIndex::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Genome-wide ordering key: chromosome rank, then 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateKey {
    /// Chromosome rank.
    pub chromosome: ChromosomeIndex,
    /// 1-based position.
    pub position: u32,
}

impl CoordinateKey {
    /// Key for a chromosome name and position.
    pub fn new(chromosome: &str, position: u32) -> Self {
        Self {
            chromosome: ChromosomeIndex::from_name(chromosome),
            position,
        }
    }
}
