//! VCF data lines as variant events.
//!
//! Only the columns the normalizer needs are interpreted (CHROM, POS, REF,
//! ALT and the `SEQ=` / `SVLEN=` INFO keys); every column is kept verbatim
//! so the record can be written back unchanged apart from POS, REF and ALT.

mod chromosome;
mod event;
mod symbolic;

pub use chromosome::{ChromosomeIndex, CoordinateKey, CHR_M, CHR_X, CHR_Y};
pub use event::{
    EventKind, EventParseError, VariantEvent, ALT_COLUMN, CHROM_COLUMN, INFO_COLUMN, POS_COLUMN,
    REF_COLUMN,
};
pub use symbolic::{
    expand_symbolic, restore_symbolic, symbolic_kind, SymbolicError, SymbolicKind, DELETION_TAG,
    INSERTION_TAG,
};
