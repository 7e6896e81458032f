use std::fmt;
use std::path::PathBuf;

/// Possible errors returned while building or querying a FIB.
///
/// Parsing errors ([FibError::MalformedAddress],
/// [FibError::PrefixLengthInvalid]) are local to the call that produced
/// them and leave the trie untouched. [FibError::MalformedRoute] aborts a
/// build: no partially built trie is ever handed out. [FibError::FileNotFound]
/// and [FibError::Io] are unrecoverable for the current run.
#[derive(Debug, PartialEq, Eq)]
pub enum FibError {
    /// A dotted quad did not consist of exactly four decimal octets in the
    /// range 0-255. Holds the offending input.
    MalformedAddress(String),
    /// A line of a route file did not have the expected
    /// `<prefix>/<len>|<path>|<next-hop>` shape. `line` is 1-based.
    MalformedRoute { line: u64, reason: String },
    /// The requested prefix length cannot exist for IPv4.
    PrefixLengthInvalid(u8),
    /// Only stride lengths of 1, 2 and 3 bits are supported.
    InvalidStride(u8),
    /// A route or query file could not be found.
    FileNotFound(PathBuf),
    /// Any other I/O failure while reading input or writing output.
    Io(String),
}

impl std::error::Error for FibError {}

impl fmt::Display for FibError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FibError::MalformedAddress(addr) => {
                write!(f, "Error: Malformed IPv4 address {:?}.", addr)
            }
            FibError::MalformedRoute { line, reason } => {
                write!(f, "Error: Invalid route on line {}: {}.", line, reason)
            }
            FibError::PrefixLengthInvalid(len) => write!(
                f,
                "Error: The specified prefix length {} is invalid.",
                len
            ),
            FibError::InvalidStride(s) => write!(
                f,
                "Error: Stride length {} is not supported, use 1, 2 or 3.",
                s
            ),
            FibError::FileNotFound(path) => {
                write!(f, "File \"{}\" not found", path.display())
            }
            FibError::Io(msg) => write!(f, "Error: I/O failure: {}", msg),
        }
    }
}

impl From<std::io::Error> for FibError {
    fn from(err: std::io::Error) -> Self {
        FibError::Io(err.to_string())
    }
}

impl From<csv::Error> for FibError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(err) => FibError::Io(err.to_string()),
            csv::ErrorKind::Utf8 { err, .. } => FibError::MalformedRoute {
                line,
                reason: err.to_string(),
            },
            kind => FibError::MalformedRoute {
                line,
                reason: format!("{:?}", kind),
            },
        }
    }
}

pub(crate) fn open_file(path: &std::path::Path) -> Result<std::fs::File, FibError> {
    std::fs::File::open(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => FibError::FileNotFound(path.to_path_buf()),
        _ => FibError::from(err),
    })
}
