//! `ufile:` protocol: UTF-8 addressed files on the host file system

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{AccessMode, NativeHandle, UrlContext, UrlProtocol, Whence};
use crate::error::{Error, Result};

/// URI scheme served by this protocol
pub const SCHEME: &str = "ufile";

const PREFIX: &[u8] = b"ufile:";

/// Strip the `ufile:` prefix and decode the rest as a host path
pub fn uri_to_path(uri: &[u8]) -> Result<PathBuf> {
    let rest = uri.strip_prefix(PREFIX).unwrap_or(uri);
    let path = std::str::from_utf8(rest).map_err(|_| Error::InvalidPath)?;
    if path.is_empty() {
        return Err(Error::InvalidPath);
    }
    Ok(PathBuf::from(path))
}

/// Open file handle
#[derive(Debug)]
pub struct UFile {
    file: File,
    path: PathBuf,
    mode: AccessMode,
}

impl UFile {
    /// Open a `ufile:` URI (the prefix is optional)
    pub fn open<U: AsRef<[u8]>>(uri: U, mode: AccessMode) -> Result<Self> {
        let path = uri_to_path(uri.as_ref()).map_err(|e| {
            log::warn!("ufile: cannot convert URI to a path");
            e
        })?;
        Self::open_path(path, mode)
    }

    /// Open a host path directly
    pub fn open_path<P: AsRef<Path>>(path: P, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        match mode {
            AccessMode::ReadWrite => {
                options.read(true).write(true).create(true).truncate(true);
            }
            AccessMode::Write => {
                options.write(true).create(true).truncate(true);
            }
            AccessMode::Read => {
                options.read(true);
            }
        }

        #[cfg(windows)]
        {
            use std::os::windows::fs::OpenOptionsExt;
            // FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE
            options.share_mode(0x1 | 0x2 | 0x4);
        }

        let file = options.open(path).map_err(|e| {
            log::warn!("ufile: open {:?} ({:?}) failed: {}", path, mode, e);
            Error::from_io(e, path)
        })?;

        log::debug!("ufile: opened {:?} ({:?})", path, mode);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
        })
    }

    /// Read up to `buf.len()` bytes; 0 means end of file
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.file.read(buf)?)
    }

    /// Write up to `buf.len()` bytes
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(self.file.write(buf)?)
    }

    /// Seek, or report the file size for [`Whence::Size`] without moving
    pub fn seek(&mut self, pos: i64, whence: Whence) -> Result<u64> {
        log::trace!("ufile: seek {} {:?} on {:?}", pos, whence, self.path);

        let target = match whence {
            Whence::Size => return self.size(),
            Whence::Set => {
                let pos = u64::try_from(pos).map_err(|_| {
                    Error::InvalidArgument(format!("negative seek position {}", pos))
                })?;
                SeekFrom::Start(pos)
            }
            Whence::Current => SeekFrom::Current(pos),
            Whence::End => SeekFrom::End(pos),
        };

        Ok(self.file.seek(target)?)
    }

    /// Total file size from the host's file status
    pub fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Raw host handle for callers needing direct access
    pub fn native_handle(&self) -> NativeHandle {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            self.file.as_raw_fd()
        }
        #[cfg(windows)]
        {
            use std::os::windows::io::AsRawHandle;
            self.file.as_raw_handle()
        }
    }

    /// Release the handle, returning the host's close result
    pub fn close(self) -> Result<()> {
        log::debug!("ufile: closing {:?}", self.path);
        close_file(self.file).map_err(|e| {
            log::warn!("ufile: close {:?} failed: {}", self.path, e);
            Error::Io(e)
        })
    }

    /// Path of the open file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Access mode the file was opened with
    pub fn mode(&self) -> AccessMode {
        self.mode
    }
}

impl UrlContext for UFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        UFile::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        UFile::write(self, buf)
    }

    fn seek(&mut self, pos: i64, whence: Whence) -> Result<u64> {
        UFile::seek(self, pos, whence)
    }

    fn native_handle(&self) -> NativeHandle {
        UFile::native_handle(self)
    }

    fn close(self: Box<Self>) -> Result<()> {
        UFile::close(*self)
    }
}

#[cfg(unix)]
fn close_file(file: File) -> io::Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

// std reports no close result on this host
#[cfg(not(unix))]
fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

/// Protocol table entry for `ufile:`
#[derive(Debug, Clone, Copy, Default)]
pub struct UFileProtocol;

impl UrlProtocol for UFileProtocol {
    fn name(&self) -> &str {
        SCHEME
    }

    fn open(&self, uri: &[u8], mode: AccessMode) -> Result<Box<dyn UrlContext>> {
        Ok(Box::new(UFile::open(uri, mode)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_with(content: &[u8]) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(content).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    fn uri_for(path: &Path) -> String {
        format!("ufile:{}", path.to_str().unwrap())
    }

    #[test]
    fn test_uri_to_path() {
        assert_eq!(uri_to_path(b"ufile:/tmp/a.mkv").unwrap(), PathBuf::from("/tmp/a.mkv"));
        assert_eq!(uri_to_path(b"/tmp/b.mkv").unwrap(), PathBuf::from("/tmp/b.mkv"));
        assert!(matches!(uri_to_path(b"ufile:\xff\xfe"), Err(Error::InvalidPath)));
        assert!(matches!(uri_to_path(b"ufile:"), Err(Error::InvalidPath)));
    }

    #[test]
    fn test_invalid_utf8_is_no_such_entry() {
        let err = UFile::open(b"ufile:/tmp/\xc3\x28".as_slice(), AccessMode::Read).unwrap_err();
        assert_eq!(err.to_averror(), -crate::error::ENOENT);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mkv");
        let err = UFile::open(uri_for(&missing), AccessMode::Read).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_read_and_size_seek() {
        let tmp = temp_with(b"0123456789");
        let mut file = UFile::open(uri_for(tmp.path()), AccessMode::Read).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(file.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"0123");

        // size query must not move the position
        assert_eq!(file.seek(0, Whence::Size).unwrap(), 10);
        assert_eq!(file.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"4567");

        file.close().unwrap();
    }

    #[test]
    fn test_standard_seeks() {
        let tmp = temp_with(b"abcdefgh");
        let mut file = UFile::open(uri_for(tmp.path()), AccessMode::Read).unwrap();

        assert_eq!(file.seek(2, Whence::Set).unwrap(), 2);
        assert_eq!(file.seek(3, Whence::Current).unwrap(), 5);
        assert_eq!(file.seek(-1, Whence::End).unwrap(), 7);

        let mut buf = [0u8; 1];
        file.read(&mut buf).unwrap();
        assert_eq!(&buf, b"h");

        assert!(matches!(
            file.seek(-1, Whence::Set),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_write_truncates() {
        let tmp = temp_with(b"old contents that are long");
        let mut file = UFile::open(uri_for(tmp.path()), AccessMode::Write).unwrap();
        assert_eq!(file.write(b"new").unwrap(), 3);
        file.close().unwrap();

        assert_eq!(std::fs::read(tmp.path()).unwrap(), b"new");
    }

    #[test]
    fn test_read_write_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("created.bin");
        let mut file = UFile::open(uri_for(&path), AccessMode::ReadWrite).unwrap();

        file.write(b"hello").unwrap();
        assert_eq!(file.seek(0, Whence::Size).unwrap(), 5);
        file.seek(0, Whence::Set).unwrap();

        let mut buf = [0u8; 5];
        assert_eq!(file.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(file.mode(), AccessMode::ReadWrite);
        file.close().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_close_write_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closed.bin");

        let mut file = UFile::open(uri_for(&path), AccessMode::Write).unwrap();
        assert_eq!(file.write(b"payload").unwrap(), 7);
        file.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");

        let file = UFile::open(uri_for(&path), AccessMode::ReadWrite).unwrap();
        file.close().unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_native_handle() {
        let tmp = temp_with(b"x");
        let file = UFile::open(uri_for(tmp.path()), AccessMode::Read).unwrap();
        assert!(file.native_handle() >= 0);
    }

    #[test]
    fn test_protocol_open() {
        let tmp = temp_with(b"protocol");
        let uri = uri_for(tmp.path());
        let mut ctx = UFileProtocol.open(uri.as_bytes(), AccessMode::Read).unwrap();
        assert_eq!(ctx.seek(0, Whence::Size).unwrap(), 8);
        ctx.close().unwrap();
    }
}
