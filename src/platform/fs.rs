// YearScope - platform/fs.rs
//
// Size-limited file reading for dataset and catalog files.

use std::fmt;
use std::io::{self, Read};
use std::path::Path;

/// Failure of a size-limited read.
#[derive(Debug)]
pub enum LimitedReadError {
    /// The file is larger than the caller's limit.
    TooLarge { size: u64, max_size: u64 },
    Io(io::Error),
}

impl fmt::Display for LimitedReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { size, max_size } => {
                write!(f, "file is {size} bytes, limit is {max_size}")
            }
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LimitedReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::TooLarge { .. } => None,
        }
    }
}

impl From<io::Error> for LimitedReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Read a whole file as text, refusing files above `max_size` bytes.
///
/// The size is checked from metadata first and enforced again while
/// reading, so a file that grows after the check is still bounded.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_to_string_limited(path: &Path, max_size: u64) -> Result<String, LimitedReadError> {
    let file = std::fs::File::open(path)?;
    let size = file.metadata()?.len();
    if size > max_size {
        return Err(LimitedReadError::TooLarge { size, max_size });
    }

    let mut bytes = Vec::with_capacity(size as usize);
    file.take(max_size + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > max_size {
        return Err(LimitedReadError::TooLarge {
            size: bytes.len() as u64,
            max_size,
        });
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File read");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
