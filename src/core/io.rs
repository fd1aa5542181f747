//! Input opening and line iteration
//!
//! Opens plain, gzip or bzip2 variant files behind one buffered reader and
//! walks their lines through a single reused buffer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader/BufWriter (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Compression applied to an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    /// Compression implied by a `.gz` or `.bz2` suffix
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "gz" => Some(Compression::Gzip),
            "bz2" => Some(Compression::Bzip2),
            _ => None,
        }
    }

    /// Compression identified by the leading bytes of a file
    pub fn from_magic(head: &[u8]) -> Self {
        if head.starts_with(GZIP_MAGIC) {
            Compression::Gzip
        } else if head.starts_with(BZIP2_MAGIC) {
            Compression::Bzip2
        } else {
            Compression::None
        }
    }
}

/// Detect compression from the file suffix, falling back to magic bytes
pub fn detect_compression(path: &Path) -> io::Result<Compression> {
    if let Some(compression) = Compression::from_extension(path) {
        return Ok(compression);
    }

    let mut head = Vec::with_capacity(BZIP2_MAGIC.len());
    File::open(path)?
        .take(BZIP2_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    Ok(Compression::from_magic(&head))
}

/// Open an input file, transparently decompressing it
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let compression = detect_compression(path)?;
    let file = File::open(path)?;
    log::debug!("Opening {:?} ({:?})", path, compression);

    let reader: Box<dyn BufRead> = match compression {
        Compression::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        Compression::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        Compression::None => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    };

    Ok(reader)
}

/// Lines of a reader, yielded from one reused buffer without their terminator
pub struct RecordLines<R> {
    reader: R,
    buffer: String,
}

impl<R: BufRead> RecordLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(4096),
        }
    }

    /// `None` at end of input
    pub fn next_line(&mut self) -> Option<io::Result<&str>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                let content = self.buffer.trim_end_matches(['\n', '\r']).len();
                self.buffer.truncate(content);
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
