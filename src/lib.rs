//! mediadesc-core - media stream descriptors and the `ufile:` I/O protocol
//!
//! This crate provides:
//! - Codec display-name resolution (profiles, levels, FourCC fallback)
//! - One-line stream descriptors for video, audio and subtitle streams
//! - A URI-addressed file protocol with a "report size" seek mode
//! - Optional FFmpeg-backed probing via ffmpeg-next (`ffmpeg` feature)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           FFI Layer                  │
//! │  (C exports via #[no_mangle])        │
//! └─────────────────────────────────────┘
//!          │                    │
//!          ▼                    ▼
//! ┌──────────────────┐ ┌──────────────────┐
//! │ Descriptor Module│ │ Protocol Module  │
//! │ (codec names,    │ │ (ufile: open/    │
//! │  stream lines)   │ │  read/seek/...)  │
//! └──────────────────┘ └──────────────────┘
//!          ▲
//!          │
//! ┌──────────────────┐
//! │  Probe Module    │
//! │  (ffmpeg-next)   │
//! └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use mediadesc_core::{describe_stream, CodecId, MediaType, StreamFacts};
//!
//! let facts = StreamFacts::new(0, MediaType::Subtitle, CodecId::Srt)
//!     .with_metadata("title", "Signs");
//! assert_eq!(describe_stream(&facts), "S: Signs (SRT)");
//! ```

pub mod descriptor;
pub mod error;
pub mod ffi;
#[cfg(feature = "ffmpeg")]
pub mod probe;
pub mod protocol;

// Re-export main types
pub use descriptor::{
    compute_bit_rate, describe_stream, resolve_codec_name, select_language, CodecId,
    CodecRegistry, DescriptorConfig, Disposition, LanguageNames, MediaType, SampleFormat,
    StreamDescriber, StreamFacts,
};
pub use error::{Error, Result};
pub use protocol::{AccessMode, ProtocolRegistry, UFile, Whence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (call once at startup)
pub fn init() {
    // Initialize logging with info level by default if RUST_LOG is not set
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();

    log::info!("mediadesc-core {} initialized", VERSION);
}
