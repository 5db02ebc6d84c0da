//! Channel layout descriptions (FFmpeg channel bit assignments)

pub const FRONT_LEFT: u64 = 0x1;
pub const FRONT_RIGHT: u64 = 0x2;
pub const FRONT_CENTER: u64 = 0x4;
pub const LOW_FREQUENCY: u64 = 0x8;
pub const BACK_LEFT: u64 = 0x10;
pub const BACK_RIGHT: u64 = 0x20;
pub const FRONT_LEFT_OF_CENTER: u64 = 0x40;
pub const FRONT_RIGHT_OF_CENTER: u64 = 0x80;
pub const BACK_CENTER: u64 = 0x100;
pub const SIDE_LEFT: u64 = 0x200;
pub const SIDE_RIGHT: u64 = 0x400;
pub const STEREO_LEFT: u64 = 1 << 29;
pub const STEREO_RIGHT: u64 = 1 << 30;

static CHANNEL_NAMES: &[&str] = &[
    "FL", "FR", "FC", "LFE", "BL", "BR", "FLC", "FRC", "BC", "SL", "SR", "TC", "TFL", "TFC",
    "TFR", "TBL", "TBC", "TBR",
];

/// Names for the bits above the contiguous block
static HIGH_CHANNEL_NAMES: &[(u32, &str)] = &[
    (29, "DL"),
    (30, "DR"),
    (31, "WL"),
    (32, "WR"),
    (33, "SDL"),
    (34, "SDR"),
    (35, "LFE2"),
];

pub const MONO: u64 = FRONT_CENTER;
pub const STEREO: u64 = FRONT_LEFT | FRONT_RIGHT;
pub const SURROUND: u64 = STEREO | FRONT_CENTER;
pub const LAYOUT_2_1: u64 = STEREO | BACK_CENTER;
pub const LAYOUT_2_2: u64 = STEREO | SIDE_LEFT | SIDE_RIGHT;
pub const QUAD: u64 = STEREO | BACK_LEFT | BACK_RIGHT;
pub const LAYOUT_4_0: u64 = SURROUND | BACK_CENTER;
pub const LAYOUT_5_0: u64 = SURROUND | SIDE_LEFT | SIDE_RIGHT;
pub const LAYOUT_5_0_BACK: u64 = SURROUND | BACK_LEFT | BACK_RIGHT;
pub const LAYOUT_5_1: u64 = LAYOUT_5_0 | LOW_FREQUENCY;
pub const LAYOUT_5_1_BACK: u64 = LAYOUT_5_0_BACK | LOW_FREQUENCY;
pub const LAYOUT_6_0_FRONT: u64 = LAYOUT_2_2 | FRONT_LEFT_OF_CENTER | FRONT_RIGHT_OF_CENTER;
pub const LAYOUT_7_1: u64 = LAYOUT_5_1 | BACK_LEFT | BACK_RIGHT;

/// Named layouts, matched on both channel count and mask
static NAMED_LAYOUTS: &[(&str, u32, u64)] = &[
    ("mono", 1, MONO),
    ("stereo", 2, STEREO),
    ("2.1", 3, STEREO | LOW_FREQUENCY),
    ("3.0", 3, SURROUND),
    ("3.0(back)", 3, LAYOUT_2_1),
    ("4.0", 4, LAYOUT_4_0),
    ("quad", 4, QUAD),
    ("quad(side)", 4, LAYOUT_2_2),
    ("3.1", 4, SURROUND | LOW_FREQUENCY),
    ("5.0", 5, LAYOUT_5_0_BACK),
    ("5.0(side)", 5, LAYOUT_5_0),
    ("4.1", 5, LAYOUT_4_0 | LOW_FREQUENCY),
    ("5.1", 6, LAYOUT_5_1_BACK),
    ("5.1(side)", 6, LAYOUT_5_1),
    ("6.0", 6, LAYOUT_5_0 | BACK_CENTER),
    ("6.0(front)", 6, LAYOUT_6_0_FRONT),
    ("hexagonal", 6, LAYOUT_5_0_BACK | BACK_CENTER),
    ("6.1", 7, LAYOUT_5_1 | BACK_CENTER),
    ("6.1(back)", 7, LAYOUT_5_1_BACK | BACK_CENTER),
    ("6.1(front)", 7, LAYOUT_6_0_FRONT | LOW_FREQUENCY),
    ("7.0", 7, LAYOUT_5_0 | BACK_LEFT | BACK_RIGHT),
    ("7.0(front)", 7, LAYOUT_5_0 | FRONT_LEFT_OF_CENTER | FRONT_RIGHT_OF_CENTER),
    ("7.1", 8, LAYOUT_7_1),
    ("7.1(wide)", 8, LAYOUT_5_1_BACK | FRONT_LEFT_OF_CENTER | FRONT_RIGHT_OF_CENTER),
    ("7.1(wide-side)", 8, LAYOUT_5_1 | FRONT_LEFT_OF_CENTER | FRONT_RIGHT_OF_CENTER),
    ("octagonal", 8, LAYOUT_5_0 | BACK_LEFT | BACK_CENTER | BACK_RIGHT),
    ("downmix", 2, STEREO_LEFT | STEREO_RIGHT),
];

fn channel_name(bit: u32) -> Option<&'static str> {
    CHANNEL_NAMES.get(bit as usize).copied().or_else(|| {
        HIGH_CHANNEL_NAMES
            .iter()
            .find(|(b, _)| *b == bit)
            .map(|(_, name)| *name)
    })
}

/// Describe a channel layout from its channel count and bitmask.
///
/// A count of 0 is taken from the mask.
pub fn describe_channel_layout(channels: u32, mask: u64) -> String {
    let channels = if channels == 0 {
        mask.count_ones()
    } else {
        channels
    };

    if let Some((name, _, _)) = NAMED_LAYOUTS
        .iter()
        .find(|(_, count, layout)| *count == channels && *layout == mask)
    {
        return name.to_string();
    }

    let mut out = format!("{} channels", channels);
    if mask != 0 {
        let names: Vec<&str> = (0..64)
            .filter(|bit| mask & (1u64 << bit) != 0)
            .filter_map(channel_name)
            .collect();
        out.push_str(&format!(" ({})", names.join("+")));
    }
    out
}
