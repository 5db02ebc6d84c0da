//! Codec registry: decoder names, profile names and fixed sample widths

use super::codec::CodecId;

/// Resolves facts about a codec that the stream itself does not carry
pub trait CodecRegistry {
    /// Display name of the decoder for this codec, if one exists
    fn decoder_name<'a>(&'a self, id: &'a CodecId) -> Option<&'a str>;

    /// Name of a raw profile value for this codec
    fn profile_name(&self, id: &CodecId, profile: i32) -> Option<&str>;

    /// Fixed bits per sample for this codec, 0 if variable or unknown
    fn bits_per_sample(&self, id: &CodecId) -> u32;
}

const H264_CONSTRAINED: i32 = 1 << 9;
const H264_INTRA: i32 = 1 << 11;

static H264_PROFILES: &[(i32, &str)] = &[
    (66, "Baseline"),
    (66 | H264_CONSTRAINED, "Constrained Baseline"),
    (77, "Main"),
    (88, "Extended"),
    (100, "High"),
    (110, "High 10"),
    (110 | H264_INTRA, "High 10 Intra"),
    (122, "High 4:2:2"),
    (122 | H264_INTRA, "High 4:2:2 Intra"),
    (144, "High 4:4:4"),
    (244, "High 4:4:4 Predictive"),
    (244 | H264_INTRA, "High 4:4:4 Intra"),
    (44, "CAVLC 4:4:4"),
];

static DTS_PROFILES: &[(i32, &str)] = &[
    (20, "DTS"),
    (30, "DTS-ES"),
    (40, "DTS 96/24"),
    (50, "DTS-HD HRA"),
    (60, "DTS-HD MA"),
    (70, "DTS Express"),
];

/// Registry backed by static tables, usable without FFmpeg
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCodecRegistry;

impl BuiltinCodecRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl CodecRegistry for BuiltinCodecRegistry {
    fn decoder_name<'a>(&'a self, id: &'a CodecId) -> Option<&'a str> {
        match id {
            CodecId::None => None,
            CodecId::Other(name) if name.is_empty() => None,
            // FFmpeg names its DTS decoder "dca"
            CodecId::Dts => Some("dca"),
            known => Some(known.name()),
        }
    }

    fn profile_name(&self, id: &CodecId, profile: i32) -> Option<&str> {
        let table = match id {
            CodecId::H264 => H264_PROFILES,
            CodecId::Dts => DTS_PROFILES,
            _ => return None,
        };
        table
            .iter()
            .find(|(value, _)| *value == profile)
            .map(|(_, name)| *name)
    }

    fn bits_per_sample(&self, id: &CodecId) -> u32 {
        SAMPLE_WIDTHS
            .iter()
            .find(|(_, names)| names.contains(&id.name()))
            .map(|(bits, _)| *bits)
            .unwrap_or(0)
    }
}

/// Fixed sample widths, matching libavcodec's `av_get_bits_per_sample`.
/// Codecs not listed have a variable width (0).
static SAMPLE_WIDTHS: &[(u32, &[&str])] = &[
    (1, &["dsd_lsbf", "dsd_msbf", "dsd_lsbf_planar", "dsd_msbf_planar"]),
    (2, &["adpcm_sbpro_2"]),
    (3, &["adpcm_sbpro_3"]),
    (
        4,
        &[
            "adpcm_sbpro_4",
            "adpcm_ima_wav",
            "adpcm_ima_qt",
            "adpcm_swf",
            "adpcm_ms",
            "adpcm_ct",
            "adpcm_ima_apc",
            "adpcm_ima_apm",
            "adpcm_ima_ea_sead",
            "adpcm_ima_oki",
            "adpcm_ima_ws",
            "adpcm_ima_ssi",
            "adpcm_g722",
            "adpcm_yamaha",
            "adpcm_aica",
        ],
    ),
    (
        8,
        &[
            "pcm_alaw",
            "pcm_mulaw",
            "pcm_vidc",
            "pcm_s8",
            "pcm_s8_planar",
            "pcm_sga",
            "pcm_u8",
            "pcm_zork",
            "sdx2_dpcm",
            "cbd2_dpcm",
            "derf_dpcm",
            "wady_dpcm",
        ],
    ),
    (
        16,
        &[
            "pcm_s16be",
            "pcm_s16be_planar",
            "pcm_s16le",
            "pcm_s16le_planar",
            "pcm_u16be",
            "pcm_u16le",
        ],
    ),
    (20, &["pcm_lxf"]),
    (
        24,
        &[
            "pcm_s24daud",
            "pcm_s24be",
            "pcm_s24le",
            "pcm_s24le_planar",
            "pcm_u24be",
            "pcm_u24le",
        ],
    ),
    (
        32,
        &[
            "pcm_s32le_planar",
            "pcm_s32be",
            "pcm_s32le",
            "pcm_u32be",
            "pcm_u32le",
            "pcm_f32be",
            "pcm_f32le",
            "pcm_f24le",
            "pcm_f16le",
        ],
    ),
    (64, &["pcm_f64be", "pcm_f64le", "pcm_s64be", "pcm_s64le"]),
];
