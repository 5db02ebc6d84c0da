//! FFI exports for C interop
//!
//! All functions in this module are exported with `#[no_mangle]`
//! and use C-compatible types for cross-language interop.
//!
//! Strings returned by this module are allocated by Rust and must be
//! released with [`mdc_string_free`], never with the C allocator.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::descriptor::{
    CodecId, DescriptorConfig, Disposition, MediaType, SampleFormat, StreamDescriber,
    StreamFacts,
};
#[cfg(feature = "ffmpeg")]
use crate::descriptor::Iso639Names;
use crate::error::{Error, EINVAL};
use crate::protocol::{AccessMode, UFile, Whence};

// Thread-local error storage
thread_local! {
    static LAST_ERROR: std::cell::RefCell<Option<CString>> = std::cell::RefCell::new(None);
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

// =============================================================================
// Result Type
// =============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdcResult {
    Success = 0,
    ErrorInvalidPointer = 1,
    ErrorNotFound = 2,
    ErrorInvalidArgument = 3,
    ErrorIo = 4,
    ErrorMemory = 5,
    ErrorFFmpeg = 6,
    ErrorUnknown = 99,
}

impl From<Error> for MdcResult {
    fn from(e: Error) -> Self {
        set_last_error(&e.to_string());
        match e.to_ffi_code() {
            1 => MdcResult::ErrorInvalidPointer,
            2 => MdcResult::ErrorNotFound,
            3 => MdcResult::ErrorInvalidArgument,
            4 => MdcResult::ErrorIo,
            5 => MdcResult::ErrorMemory,
            6 => MdcResult::ErrorFFmpeg,
            _ => MdcResult::ErrorUnknown,
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

/// Get last error message
#[no_mangle]
pub extern "C" fn mdc_get_last_error() -> *const c_char {
    LAST_ERROR.with(|e| e.borrow().as_ref().map(|s| s.as_ptr()).unwrap_or(ptr::null()))
}

/// Clear last error
#[no_mangle]
pub extern "C" fn mdc_clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Initialize the library (sets up logging).
/// Call once at application startup.
#[no_mangle]
pub extern "C" fn mdc_init() {
    crate::init();
}

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Get library version
#[no_mangle]
pub extern "C" fn mdc_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

// =============================================================================
// Stream Descriptors
// =============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MdcDescriptorConfig {
    pub translate_language: bool,
    pub show_pixel_format: bool,
    pub show_bit_rate: bool,
}

impl From<&MdcDescriptorConfig> for DescriptorConfig {
    fn from(c: &MdcDescriptorConfig) -> Self {
        DescriptorConfig {
            translate_language: c.translate_language,
            show_pixel_format: c.show_pixel_format,
            show_bit_rate: c.show_bit_rate,
        }
    }
}

/// Stream facts as supplied by a C demuxer. All string fields may be null.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MdcStreamFacts {
    pub index: i32,
    /// `AVMediaType` value
    pub media_type: i32,
    /// FFmpeg short codec name (e.g. "h264")
    pub codec_id: *const c_char,
    /// Codec name embedded in the stream
    pub codec_name: *const c_char,
    pub bit_rate: i64,
    pub profile: i32,
    pub level: i32,
    pub pixel_format: *const c_char,
    pub width: u32,
    pub height: u32,
    pub sample_rate: u32,
    pub channels: u32,
    pub channel_layout: u64,
    /// FFmpeg sample format name (e.g. "s16")
    pub sample_format: *const c_char,
    pub bits_per_raw_sample: u32,
    pub codec_tag: u32,
    /// Stream-level language field
    pub language: *const c_char,
    /// "language" metadata entry
    pub metadata_language: *const c_char,
    /// "title" metadata entry
    pub title: *const c_char,
    /// `AV_DISPOSITION_*` bits
    pub disposition: u32,
}

/// Read an optional C string; invalid UTF-8 is replaced, not rejected
unsafe fn opt_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

impl MdcStreamFacts {
    /// # Safety
    /// Every non-null string field must point to a NUL-terminated string.
    unsafe fn to_facts(&self) -> StreamFacts {
        let codec_id = opt_string(self.codec_id)
            .map(|name| CodecId::from_name(&name))
            .unwrap_or_default();

        let mut facts = StreamFacts::new(self.index, MediaType::from_raw(self.media_type), codec_id);
        facts.bit_rate = self.bit_rate;
        facts.profile = self.profile;
        facts.level = self.level;
        facts.codec_name = opt_string(self.codec_name).unwrap_or_default();
        facts.pixel_format = opt_string(self.pixel_format);
        facts.width = self.width;
        facts.height = self.height;
        facts.sample_rate = self.sample_rate;
        facts.channels = self.channels;
        facts.channel_layout = self.channel_layout;
        facts.sample_format = opt_string(self.sample_format)
            .map(|name| SampleFormat::from_name(&name))
            .unwrap_or_default();
        facts.bits_per_raw_sample = self.bits_per_raw_sample;
        facts.codec_tag = self.codec_tag;
        facts.language = opt_string(self.language);
        facts.disposition = Disposition::from_bits(self.disposition);

        if let Some(lang) = opt_string(self.metadata_language) {
            facts.metadata.insert("language".to_string(), lang);
        }
        if let Some(title) = opt_string(self.title) {
            facts.metadata.insert("title".to_string(), title);
        }
        facts
    }
}

/// Describer used by the C ABI: libavcodec's tables when linked, the
/// built-in ones otherwise
fn describer(config: DescriptorConfig) -> StreamDescriber<'static> {
    #[cfg(feature = "ffmpeg")]
    let describer = StreamDescriber::new(&crate::probe::FfmpegCodecRegistry, &Iso639Names);
    #[cfg(not(feature = "ffmpeg"))]
    let describer = StreamDescriber::default();

    describer.with_config(config)
}

/// Describe a stream.
///
/// On success `*out_name` receives a NUL-terminated UTF-8 string that the
/// caller must release with [`mdc_string_free`]. `config` may be null.
#[no_mangle]
pub extern "C" fn mdc_describe_stream(
    facts: *const MdcStreamFacts,
    config: *const MdcDescriptorConfig,
    out_name: *mut *mut c_char,
) -> MdcResult {
    if facts.is_null() || out_name.is_null() {
        log::warn!("FFI::mdc_describe_stream - facts or out_name is null");
        return Error::InvalidPointer.into();
    }

    let config = if config.is_null() {
        DescriptorConfig::default()
    } else {
        unsafe { DescriptorConfig::from(&*config) }
    };

    let facts = unsafe { (*facts).to_facts() };
    let line = describer(config).describe(&facts);

    match CString::new(line) {
        Ok(name) => {
            unsafe {
                *out_name = name.into_raw();
            }
            MdcResult::Success
        }
        Err(e) => {
            log::error!("FFI::mdc_describe_stream - descriptor contains NUL: {}", e);
            unsafe {
                *out_name = ptr::null_mut();
            }
            Error::InvalidArgument("descriptor contains an interior NUL".into()).into()
        }
    }
}

/// Release a string returned by this library
#[no_mangle]
pub extern "C" fn mdc_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            drop(CString::from_raw(s));
        }
    }
}

// =============================================================================
// ufile Protocol
// =============================================================================

/// Opaque handle for an open `ufile:` URI
pub struct MdcUFileHandle {
    file: UFile,
}

/// Protocol operation table. Return values follow the FFmpeg convention:
/// non-negative on success, negative errno on failure.
#[repr(C)]
pub struct MdcUrlProtocol {
    pub name: *const c_char,
    pub url_open: extern "C" fn(*mut *mut MdcUFileHandle, *const c_char, i32) -> i32,
    pub url_read: extern "C" fn(*mut MdcUFileHandle, *mut u8, i32) -> i32,
    pub url_write: extern "C" fn(*mut MdcUFileHandle, *const u8, i32) -> i32,
    pub url_seek: extern "C" fn(*mut MdcUFileHandle, i64, i32) -> i64,
    pub url_close: extern "C" fn(*mut MdcUFileHandle) -> i32,
    pub url_get_file_handle: extern "C" fn(*mut MdcUFileHandle) -> isize,
}

// Only points at 'static data and functions
unsafe impl Sync for MdcUrlProtocol {}

static UFILE_NAME: &[u8] = b"ufile\0";

static UFILE_PROTOCOL: MdcUrlProtocol = MdcUrlProtocol {
    name: UFILE_NAME.as_ptr() as *const c_char,
    url_open: mdc_ufile_open,
    url_read: mdc_ufile_read,
    url_write: mdc_ufile_write,
    url_seek: mdc_ufile_seek,
    url_close: mdc_ufile_close,
    url_get_file_handle: mdc_ufile_get_handle,
};

/// Operation table for the `ufile` scheme
#[no_mangle]
pub extern "C" fn mdc_ufile_protocol() -> *const MdcUrlProtocol {
    &UFILE_PROTOCOL
}

/// Open a `ufile:` URI. `flags` uses `AVIO_FLAG_*` values.
#[no_mangle]
pub extern "C" fn mdc_ufile_open(
    out_handle: *mut *mut MdcUFileHandle,
    uri: *const c_char,
    flags: i32,
) -> i32 {
    if out_handle.is_null() || uri.is_null() {
        set_last_error("Invalid pointer");
        return -EINVAL;
    }

    let uri = unsafe { CStr::from_ptr(uri) };
    match UFile::open(uri.to_bytes(), AccessMode::from_flags(flags)) {
        Ok(file) => {
            unsafe {
                *out_handle = Box::into_raw(Box::new(MdcUFileHandle { file }));
            }
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            unsafe {
                *out_handle = ptr::null_mut();
            }
            e.to_averror()
        }
    }
}

/// Read up to `size` bytes
#[no_mangle]
pub extern "C" fn mdc_ufile_read(handle: *mut MdcUFileHandle, buf: *mut u8, size: i32) -> i32 {
    if handle.is_null() || buf.is_null() || size < 0 {
        return -EINVAL;
    }
    let handle = unsafe { &mut *handle };
    let buf = unsafe { std::slice::from_raw_parts_mut(buf, size as usize) };
    match handle.file.read(buf) {
        Ok(n) => n as i32,
        Err(e) => e.to_averror(),
    }
}

/// Write up to `size` bytes
#[no_mangle]
pub extern "C" fn mdc_ufile_write(handle: *mut MdcUFileHandle, buf: *const u8, size: i32) -> i32 {
    if handle.is_null() || buf.is_null() || size < 0 {
        return -EINVAL;
    }
    let handle = unsafe { &mut *handle };
    let buf = unsafe { std::slice::from_raw_parts(buf, size as usize) };
    match handle.file.write(buf) {
        Ok(n) => n as i32,
        Err(e) => e.to_averror(),
    }
}

/// Seek. `whence == 0x10000` returns the file size without moving.
#[no_mangle]
pub extern "C" fn mdc_ufile_seek(handle: *mut MdcUFileHandle, pos: i64, whence: i32) -> i64 {
    if handle.is_null() {
        return -EINVAL as i64;
    }
    let handle = unsafe { &mut *handle };
    let result = Whence::from_raw(whence).and_then(|whence| handle.file.seek(pos, whence));
    match result {
        Ok(offset) => offset as i64,
        Err(e) => e.to_averror() as i64,
    }
}

/// Close and free the handle
#[no_mangle]
pub extern "C" fn mdc_ufile_close(handle: *mut MdcUFileHandle) -> i32 {
    if handle.is_null() {
        return -EINVAL;
    }
    let handle = unsafe { Box::from_raw(handle) };
    match handle.file.close() {
        Ok(()) => 0,
        Err(e) => e.to_averror(),
    }
}

/// Native host handle (fd on Unix, HANDLE on Windows), -1 for a null handle
#[no_mangle]
pub extern "C" fn mdc_ufile_get_handle(handle: *mut MdcUFileHandle) -> isize {
    if handle.is_null() {
        return -1;
    }
    let handle = unsafe { &*handle };
    handle.file.native_handle() as isize
}
