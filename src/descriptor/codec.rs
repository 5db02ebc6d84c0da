//! Codec identities and display-name resolution

use std::fmt;

use super::facts::UNKNOWN;

/// Codec identity, keyed by FFmpeg short codec name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodecId {
    None,
    // Video
    H264,
    Vc1,
    Mpeg2Video,
    // Audio
    Dts,
    TrueHd,
    Mlp,
    Ac3,
    Eac3,
    AacLatm,
    Flac,
    WmaLossless,
    WavPack,
    Mp4Als,
    Alac,
    /// Any identity in the PCM/ADPCM range
    Pcm(String),
    // Subtitles
    Text,
    Srt,
    HdmvPgsSubtitle,
    DvdSubtitle,
    DvbSubtitle,
    Ssa,
    Xsub,
    /// Any other codec, by short name
    Other(String),
}

impl Default for CodecId {
    fn default() -> Self {
        CodecId::None
    }
}

impl CodecId {
    /// Parse an FFmpeg short codec name
    pub fn from_name(name: &str) -> Self {
        match name {
            "" | "none" => CodecId::None,
            "h264" => CodecId::H264,
            "vc1" => CodecId::Vc1,
            "mpeg2video" => CodecId::Mpeg2Video,
            "dts" => CodecId::Dts,
            "truehd" => CodecId::TrueHd,
            "mlp" => CodecId::Mlp,
            "ac3" => CodecId::Ac3,
            "eac3" => CodecId::Eac3,
            "aac_latm" => CodecId::AacLatm,
            "flac" => CodecId::Flac,
            "wmalossless" => CodecId::WmaLossless,
            "wavpack" => CodecId::WavPack,
            "mp4als" => CodecId::Mp4Als,
            "alac" => CodecId::Alac,
            "text" => CodecId::Text,
            "srt" | "subrip" => CodecId::Srt,
            "hdmv_pgs_subtitle" => CodecId::HdmvPgsSubtitle,
            "dvd_subtitle" => CodecId::DvdSubtitle,
            "dvb_subtitle" => CodecId::DvbSubtitle,
            "ssa" | "ass" => CodecId::Ssa,
            "xsub" => CodecId::Xsub,
            n if n.starts_with("pcm_") || n.starts_with("adpcm_") || n == "s302m" => {
                CodecId::Pcm(n.to_string())
            }
            n => CodecId::Other(n.to_string()),
        }
    }

    /// FFmpeg short codec name
    pub fn name(&self) -> &str {
        match self {
            CodecId::None => "none",
            CodecId::H264 => "h264",
            CodecId::Vc1 => "vc1",
            CodecId::Mpeg2Video => "mpeg2video",
            CodecId::Dts => "dts",
            CodecId::TrueHd => "truehd",
            CodecId::Mlp => "mlp",
            CodecId::Ac3 => "ac3",
            CodecId::Eac3 => "eac3",
            CodecId::AacLatm => "aac_latm",
            CodecId::Flac => "flac",
            CodecId::WmaLossless => "wmalossless",
            CodecId::WavPack => "wavpack",
            CodecId::Mp4Als => "mp4als",
            CodecId::Alac => "alac",
            CodecId::Text => "text",
            CodecId::Srt => "srt",
            CodecId::HdmvPgsSubtitle => "hdmv_pgs_subtitle",
            CodecId::DvdSubtitle => "dvd_subtitle",
            CodecId::DvbSubtitle => "dvb_subtitle",
            CodecId::Ssa => "ssa",
            CodecId::Xsub => "xsub",
            CodecId::Pcm(name) | CodecId::Other(name) => name,
        }
    }

    /// Whether the identity lies in the PCM/ADPCM range
    pub fn is_pcm(&self) -> bool {
        matches!(self, CodecId::Pcm(_))
    }

    /// Whether the decoded output reveals the source sample format
    /// (PCM and lossless codecs)
    pub fn shows_sample_format(&self) -> bool {
        matches!(
            self,
            CodecId::Pcm(_)
                | CodecId::Mlp
                | CodecId::TrueHd
                | CodecId::Flac
                | CodecId::WmaLossless
                | CodecId::WavPack
                | CodecId::Mp4Als
                | CodecId::Alac
        )
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Preferred display names for well-known codecs. First match wins.
pub static NICE_CODEC_NAMES: &[(CodecId, &str)] = &[
    // Video
    (CodecId::Vc1, "VC-1"),
    (CodecId::Mpeg2Video, "MPEG-2"),
    // Audio
    (CodecId::TrueHd, "TrueHD"),
    (CodecId::Ac3, "AC-3"),
    (CodecId::Eac3, "E-AC3"),
    (CodecId::AacLatm, "AAC (LATM)"),
    // Subs
    (CodecId::Text, "Text"),
    (CodecId::Srt, "SRT"),
    (CodecId::HdmvPgsSubtitle, "PGS"),
    (CodecId::DvdSubtitle, "DVD/VOB"),
    (CodecId::DvbSubtitle, "DVB"),
    (CodecId::Ssa, "SSA/ASS"),
    (CodecId::Xsub, "XSUB"),
];

/// Look up the preferred display name for a codec
pub fn nice_name(id: &CodecId) -> Option<&'static str> {
    NICE_CODEC_NAMES
        .iter()
        .find(|(entry, _)| entry == id)
        .map(|(_, name)| *name)
}

/// Uppercase ASCII letters, leave everything else untouched
pub fn up(s: &str) -> String {
    s.to_ascii_uppercase()
}

/// Render a FourCC tag: printable bytes as-is, others as `[N]`
pub fn codec_tag_string(tag: u32) -> String {
    let mut out = String::with_capacity(4);
    for byte in tag.to_le_bytes() {
        let c = byte as char;
        if c.is_ascii_alphanumeric() || c == '.' || c == ' ' {
            out.push(c);
        } else {
            out.push_str(&format!("[{}]", byte));
        }
    }
    out
}

/// Everything the resolver needs to know about one codec
#[derive(Debug, Clone, Copy)]
pub struct CodecNameInput<'a> {
    pub codec_id: &'a CodecId,
    pub profile_name: Option<&'a str>,
    pub level: i32,
    pub decoder_name: Option<&'a str>,
    pub embedded_name: &'a str,
    pub codec_tag: u32,
}

fn usable_level(level: i32) -> bool {
    level != 0 && level != UNKNOWN && level < 1000
}

/// Resolve a short display name for a codec. Never returns an empty string.
pub fn resolve_codec_name(input: &CodecNameInput<'_>) -> String {
    let profile = input.profile_name.filter(|p| !p.is_empty());

    match (input.codec_id, profile) {
        (CodecId::H264, Some(profile)) => {
            let mut name = format!("H.264 {}", profile);
            if usable_level(input.level) {
                name.push_str(&format!(" L{:.1}", input.level as f64 / 10.0));
            }
            return name;
        }
        (CodecId::Dts, Some(profile)) => return profile.to_string(),
        _ => {}
    }

    if let Some(name) = nice_name(input.codec_id) {
        return name.to_string();
    }

    if let Some(decoder) = input.decoder_name.filter(|d| !d.is_empty()) {
        return up(decoder);
    }

    if !input.embedded_name.is_empty() {
        return up(input.embedded_name);
    }

    format!(
        "{} / 0x{:04X}",
        codec_tag_string(input.codec_tag),
        input.codec_tag
    )
}
