//! Stream facts: the per-stream input to descriptor generation

use std::collections::HashMap;

use super::codec::CodecId;

/// Profile/level value meaning "not signalled"
pub const UNKNOWN: i32 = -99;

/// Media type of an elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MediaType {
    Unknown = -1,
    Video = 0,
    Audio = 1,
    Data = 2,
    Subtitle = 3,
    Attachment = 4,
}

impl MediaType {
    /// Map an FFmpeg `AVMediaType` value
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => MediaType::Video,
            1 => MediaType::Audio,
            2 => MediaType::Data,
            3 => MediaType::Subtitle,
            4 => MediaType::Attachment,
            _ => MediaType::Unknown,
        }
    }
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Unknown
    }
}

/// Audio sample format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    None,
    U8,
    S16,
    S32,
    S64,
    Flt,
    Dbl,
    U8p,
    S16p,
    S32p,
    S64p,
    Fltp,
    Dblp,
}

impl Default for SampleFormat {
    fn default() -> Self {
        SampleFormat::None
    }
}

impl SampleFormat {
    /// Parse an FFmpeg sample format name (`"s16"`, `"fltp"`, ...)
    pub fn from_name(name: &str) -> Self {
        match name {
            "u8" => SampleFormat::U8,
            "s16" => SampleFormat::S16,
            "s32" => SampleFormat::S32,
            "s64" => SampleFormat::S64,
            "flt" => SampleFormat::Flt,
            "dbl" => SampleFormat::Dbl,
            "u8p" => SampleFormat::U8p,
            "s16p" => SampleFormat::S16p,
            "s32p" => SampleFormat::S32p,
            "s64p" => SampleFormat::S64p,
            "fltp" => SampleFormat::Fltp,
            "dblp" => SampleFormat::Dblp,
            _ => SampleFormat::None,
        }
    }

    /// Whether samples are floating point (single or double precision)
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            SampleFormat::Flt | SampleFormat::Dbl | SampleFormat::Fltp | SampleFormat::Dblp
        )
    }

    /// Bytes per sample, 0 when unknown
    pub fn bytes_per_sample(&self) -> u32 {
        match self {
            SampleFormat::None => 0,
            SampleFormat::U8 | SampleFormat::U8p => 1,
            SampleFormat::S16 | SampleFormat::S16p => 2,
            SampleFormat::S32 | SampleFormat::S32p | SampleFormat::Flt | SampleFormat::Fltp => 4,
            SampleFormat::S64 | SampleFormat::S64p | SampleFormat::Dbl | SampleFormat::Dblp => 8,
        }
    }
}

/// Stream disposition flags (FFmpeg `AV_DISPOSITION_*` bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Disposition(u32);

impl Disposition {
    pub const DEFAULT: Disposition = Disposition(0x0001);
    pub const FORCED: Disposition = Disposition(0x0040);
    pub const HEARING_IMPAIRED: Disposition = Disposition(0x0080);

    /// Build from raw bits; unknown bits are kept
    pub const fn from_bits(bits: u32) -> Self {
        Disposition(bits)
    }

    pub const fn empty() -> Self {
        Disposition(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Disposition) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Disposition {
    type Output = Disposition;

    fn bitor(self, rhs: Disposition) -> Disposition {
        Disposition(self.0 | rhs.0)
    }
}

/// Decoded container/codec metadata for one elementary stream
#[derive(Debug, Clone, Default)]
pub struct StreamFacts {
    /// Stream index in the container
    pub index: i32,

    /// Codec identity
    pub codec_id: CodecId,

    /// Media type
    pub media_type: MediaType,

    /// Declared bit rate in bps
    pub bit_rate: i64,

    /// Raw codec profile, [`UNKNOWN`] when not signalled
    pub profile: i32,

    /// Raw codec level, [`UNKNOWN`] when not signalled
    pub level: i32,

    /// Pixel format name (e.g. "yuv420p")
    pub pixel_format: Option<String>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels
    pub channels: u32,

    /// Channel layout bitmask, 0 when unknown
    pub channel_layout: u64,

    /// Sample format
    pub sample_format: SampleFormat,

    /// Bits per raw sample as reported by the demuxer
    pub bits_per_raw_sample: u32,

    /// Raw codec tag (FourCC, little-endian)
    pub codec_tag: u32,

    /// Codec name embedded in the stream, may be empty
    pub codec_name: String,

    /// Stream-level language field
    pub language: Option<String>,

    /// Stream metadata
    pub metadata: HashMap<String, String>,

    /// Disposition flags
    pub disposition: Disposition,
}

impl StreamFacts {
    /// Create facts for a stream with unknown profile/level
    pub fn new(index: i32, media_type: MediaType, codec_id: CodecId) -> Self {
        Self {
            index,
            codec_id,
            media_type,
            profile: UNKNOWN,
            level: UNKNOWN,
            ..Default::default()
        }
    }

    /// Look up a metadata entry
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Title from the stream metadata, if non-empty
    pub fn title(&self) -> Option<&str> {
        self.metadata_value("title").filter(|t| !t.is_empty())
    }

    /// Set a metadata entry (builder style)
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Set disposition flags (builder style)
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    pub fn is_audio(&self) -> bool {
        self.media_type == MediaType::Audio
    }

    pub fn is_subtitle(&self) -> bool {
        self.media_type == MediaType::Subtitle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_facts_have_unknown_profile() {
        let facts = StreamFacts::new(1, MediaType::Video, CodecId::H264);
        assert_eq!(facts.profile, UNKNOWN);
        assert_eq!(facts.level, UNKNOWN);
        assert!(facts.is_video());
        assert!(facts.title().is_none());
    }

    #[test]
    fn test_empty_title_is_absent() {
        let facts = StreamFacts::new(0, MediaType::Audio, CodecId::Ac3).with_metadata("title", "");
        assert!(facts.title().is_none());
    }

    #[test]
    fn test_sample_format() {
        assert!(SampleFormat::from_name("fltp").is_float());
        assert!(SampleFormat::Dbl.is_float());
        assert!(!SampleFormat::S32.is_float());
        assert_eq!(SampleFormat::from_name("s16").bytes_per_sample(), 2);
        assert_eq!(SampleFormat::from_name("bogus"), SampleFormat::None);
    }

    #[test]
    fn test_disposition_flags() {
        let d = Disposition::FORCED | Disposition::HEARING_IMPAIRED;
        assert!(d.contains(Disposition::FORCED));
        assert!(d.contains(Disposition::HEARING_IMPAIRED));
        assert!(!d.contains(Disposition::DEFAULT));
        assert_eq!(d.bits(), 0xC0);
    }

    #[test]
    fn test_media_type_from_raw() {
        assert_eq!(MediaType::from_raw(3), MediaType::Subtitle);
        assert_eq!(MediaType::from_raw(42), MediaType::Unknown);
    }
}
