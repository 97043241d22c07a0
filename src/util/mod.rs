//! Utility functions

mod io;

pub use io::{is_gzipped, open_reader, open_writer};
