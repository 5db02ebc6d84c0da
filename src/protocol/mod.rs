//! URI-addressed I/O protocols
//!
//! A protocol is a small operation table (open, read, write, seek, close,
//! native handle) registered under a URI scheme, so a media pipeline can
//! dispatch `scheme:...` URIs to it instead of default file handling.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};

mod ufile;

pub use ufile::{uri_to_path, UFile, UFileProtocol, SCHEME as UFILE_SCHEME};

/// `AVIO_FLAG_READ`
pub const FLAG_READ: i32 = 1;
/// `AVIO_FLAG_WRITE`
pub const FLAG_WRITE: i32 = 2;
/// `AVIO_FLAG_READ_WRITE`
pub const FLAG_READ_WRITE: i32 = FLAG_READ | FLAG_WRITE;

pub const SEEK_SET: i32 = 0;
pub const SEEK_CUR: i32 = 1;
pub const SEEK_END: i32 = 2;
/// Seek mode that reports the total size instead of moving
pub const SEEK_SIZE: i32 = 0x10000;
/// Hint bit some callers OR into the seek mode; ignored
pub const SEEK_FORCE: i32 = 0x20000;

/// Host handle type exposed by [`UrlContext::native_handle`]
#[cfg(unix)]
pub type NativeHandle = std::os::unix::io::RawFd;
#[cfg(windows)]
pub type NativeHandle = std::os::windows::io::RawHandle;

/// How a URI is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read only
    Read,
    /// Create, truncate, write only
    Write,
    /// Create, truncate, read and write
    ReadWrite,
}

impl AccessMode {
    /// Map open flags: read-write, then write-only, otherwise read-only
    pub fn from_flags(flags: i32) -> Self {
        if flags & FLAG_READ_WRITE == FLAG_READ_WRITE {
            AccessMode::ReadWrite
        } else if flags & FLAG_WRITE != 0 {
            AccessMode::Write
        } else {
            AccessMode::Read
        }
    }
}

impl Default for AccessMode {
    fn default() -> Self {
        AccessMode::Read
    }
}

/// Seek origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Set,
    Current,
    End,
    /// Report the total size; the position is left unchanged
    Size,
}

impl Whence {
    /// Map a raw `whence` value
    pub fn from_raw(whence: i32) -> Result<Self> {
        match whence & !SEEK_FORCE {
            SEEK_SET => Ok(Whence::Set),
            SEEK_CUR => Ok(Whence::Current),
            SEEK_END => Ok(Whence::End),
            SEEK_SIZE => Ok(Whence::Size),
            other => Err(Error::InvalidArgument(format!("unknown seek mode {:#x}", other))),
        }
    }
}

/// An open URI
pub trait UrlContext: Send {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Returns the new offset, or the total size for [`Whence::Size`]
    fn seek(&mut self, pos: i64, whence: Whence) -> Result<u64>;

    fn native_handle(&self) -> NativeHandle;

    fn close(self: Box<Self>) -> Result<()>;
}

/// A protocol that can open URIs of one scheme
pub trait UrlProtocol: Send + Sync {
    /// Scheme name, without the colon
    fn name(&self) -> &str;

    fn open(&self, uri: &[u8], mode: AccessMode) -> Result<Box<dyn UrlContext>>;
}

/// Extract the scheme of a URI. Single letters are treated as drive
/// letters, not schemes.
pub fn uri_scheme(uri: &[u8]) -> Option<&str> {
    let colon = uri.iter().position(|&b| b == b':')?;
    let scheme = &uri[..colon];
    if scheme.len() < 2 || !scheme[0].is_ascii_alphabetic() {
        return None;
    }
    if !scheme
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
    {
        return None;
    }
    std::str::from_utf8(scheme).ok()
}

/// Scheme → protocol table
pub struct ProtocolRegistry {
    protocols: RwLock<HashMap<String, Arc<dyn UrlProtocol>>>,
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ProtocolRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            protocols: RwLock::new(HashMap::new()),
        }
    }

    /// Registry with the `ufile` protocol registered
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(UFileProtocol));
        registry
    }

    /// Register a protocol under its name, returning the one it replaced
    pub fn register(&self, protocol: Arc<dyn UrlProtocol>) -> Option<Arc<dyn UrlProtocol>> {
        let name = protocol.name().to_string();
        log::debug!("Registering protocol: {}", name);
        self.protocols.write().insert(name, protocol)
    }

    /// Find the protocol for a scheme
    pub fn find(&self, scheme: &str) -> Option<Arc<dyn UrlProtocol>> {
        self.protocols.read().get(scheme).cloned()
    }

    /// Registered scheme names, sorted
    pub fn schemes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.protocols.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Open a URI with the protocol registered for its scheme
    pub fn open(&self, uri: &[u8], mode: AccessMode) -> Result<Box<dyn UrlContext>> {
        let lossy = || String::from_utf8_lossy(uri).into_owned();

        let scheme = uri_scheme(uri).ok_or_else(|| Error::ProtocolNotFound(lossy()))?;
        let protocol = self
            .find(scheme)
            .ok_or_else(|| Error::ProtocolNotFound(lossy()))?;

        protocol.open(uri, mode)
    }
}
