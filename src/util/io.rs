use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Whether `path` names a gzip-compressed file.
pub fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

/// Buffered reader over a plain or gzipped file, or stdin for `-`.
pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path)?;
    let inner: Box<dyn Read> = if is_gzipped(path) {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(inner)))
}

/// Buffered writer to a file, or stdout when no path (or `-`) is given.
pub fn open_writer(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) if path != Path::new("-") => {
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    #[test]
    fn reads_gzipped_and_plain_files() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("ref.fa");
        std::fs::write(&plain, ">chr1\nACGT\n").unwrap();

        let gz = dir.path().join("ref.fa.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(b">chr1\nACGT\n").unwrap();
        encoder.finish().unwrap();

        for path in [&plain, &gz] {
            let mut contents = String::new();
            open_reader(path).unwrap().read_to_string(&mut contents).unwrap();
            assert_eq!(contents, ">chr1\nACGT\n");
        }
        assert!(is_gzipped(&gz));
        assert!(!is_gzipped(&plain));
    }
}
