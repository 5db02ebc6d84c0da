//! Error types for mediadesc-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mediadesc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// `ENOENT`, as reported across the C boundary
pub const ENOENT: i32 = 2;
/// `EIO`
pub const EIO: i32 = 5;
/// `ENOMEM`
pub const ENOMEM: i32 = 12;
/// `EINVAL`
pub const EINVAL: i32 = 22;
/// `ENOSYS`
pub const ENOSYS: i32 = 38;

/// Error types for descriptor and file protocol operations
#[derive(Error, Debug)]
pub enum Error {
    /// Null pointer passed where a value was required
    #[error("Invalid pointer")]
    InvalidPointer,

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Path bytes could not be converted to a host path
    #[error("Invalid path encoding")]
    InvalidPath,

    /// Invalid argument (e.g. unknown seek mode)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No protocol registered for a URI scheme
    #[error("Protocol not found for URI: {0}")]
    ProtocolNotFound(String),

    /// IO error from the host
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory allocation error
    #[error("Memory allocation failed")]
    Memory,

    /// FFmpeg error with code
    #[error("FFmpeg error {code}: {message}")]
    FFmpeg { code: i32, message: String },

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Convert to FFI result code
    pub fn to_ffi_code(&self) -> i32 {
        match self {
            Error::InvalidPointer => 1,
            Error::NotFound(_) | Error::InvalidPath | Error::ProtocolNotFound(_) => 2,
            Error::InvalidArgument(_) => 3,
            Error::Io(_) => 4,
            Error::Memory => 5,
            Error::FFmpeg { .. } => 6,
            Error::Unknown(_) => 99,
        }
    }

    /// Convert to a negative errno value (FFmpeg `AVERROR` convention)
    pub fn to_averror(&self) -> i32 {
        match self {
            Error::NotFound(_) | Error::InvalidPath | Error::ProtocolNotFound(_) => -ENOENT,
            Error::InvalidPointer | Error::InvalidArgument(_) => -EINVAL,
            Error::Io(e) => -e.raw_os_error().unwrap_or(EIO),
            Error::Memory => -ENOMEM,
            Error::FFmpeg { code, .. } => *code,
            Error::Unknown(_) => -ENOSYS,
        }
    }

    /// Create from FFmpeg error code
    pub fn from_ffmpeg(code: i32) -> Self {
        let message = match code {
            -2 => "No such file or directory",
            -5 => "Input/output error",
            -12 => "Cannot allocate memory",
            -22 => "Invalid argument",
            -1094995529 => "Invalid data found",
            -1414092869 => "End of file",
            _ => "Unknown FFmpeg error",
        };

        Error::FFmpeg {
            code,
            message: message.to_string(),
        }
    }

    /// Wrap a host IO error, mapping "not found" to [`Error::NotFound`]
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.to_path_buf())
        } else {
            Error::Io(err)
        }
    }
}

#[cfg(feature = "ffmpeg")]
impl From<ffmpeg_next::Error> for Error {
    fn from(e: ffmpeg_next::Error) -> Self {
        let code: i32 = e.into();
        Error::FFmpeg {
            code,
            message: e.to_string(),
        }
    }
}
