//! Stream descriptor module
//!
//! Turns the decoded facts of one elementary stream into a single display
//! line such as `A: Commentary [eng] (AC-3, 48000 Hz, 5.1(side), 448 kb/s) [default]`.

pub mod channel_layout;
pub(crate) mod codec;
pub(crate) mod config;
mod facts;
pub(crate) mod language;
pub(crate) mod registry;

pub use channel_layout::describe_channel_layout;
pub use codec::{
    codec_tag_string, nice_name, resolve_codec_name, CodecId, CodecNameInput, NICE_CODEC_NAMES,
};
pub use config::DescriptorConfig;
pub use facts::{Disposition, MediaType, SampleFormat, StreamFacts, UNKNOWN};
pub use language::{
    language_display_name, select_language, Iso639Names, LanguageNames, NoLanguageNames,
};
pub use registry::{BuiltinCodecRegistry, CodecRegistry};

/// Effective bit rate of a stream in bps.
///
/// Audio codecs with a fixed sample width have no meaningful declared rate in
/// many containers, so it is computed from the sample geometry instead.
pub fn compute_bit_rate(
    media_type: MediaType,
    declared_bit_rate: i64,
    sample_rate: u32,
    channels: u32,
    bits_per_sample: u32,
) -> i64 {
    match media_type {
        MediaType::Video | MediaType::Data | MediaType::Subtitle | MediaType::Attachment => {
            declared_bit_rate
        }
        MediaType::Audio => {
            if bits_per_sample != 0 {
                sample_rate as i64 * channels as i64 * bits_per_sample as i64
            } else {
                declared_bit_rate
            }
        }
        MediaType::Unknown => 0,
    }
}

/// Builds descriptor lines from stream facts
pub struct StreamDescriber<'a> {
    registry: &'a (dyn CodecRegistry + Sync),
    languages: &'a (dyn LanguageNames + Sync),
    config: DescriptorConfig,
}

impl Default for StreamDescriber<'static> {
    fn default() -> Self {
        Self::new(&BuiltinCodecRegistry, &Iso639Names)
    }
}

impl<'a> StreamDescriber<'a> {
    /// Create a describer over the given registry and language lookup
    pub fn new(
        registry: &'a (dyn CodecRegistry + Sync),
        languages: &'a (dyn LanguageNames + Sync),
    ) -> Self {
        Self {
            registry,
            languages,
            config: DescriptorConfig::default(),
        }
    }

    /// Replace the configuration (builder style)
    pub fn with_config(mut self, config: DescriptorConfig) -> Self {
        self.config = config;
        self
    }

    /// Display name of the stream's codec
    pub fn codec_name(&self, stream: &StreamFacts) -> String {
        let id = &stream.codec_id;
        resolve_codec_name(&CodecNameInput {
            codec_id: id,
            profile_name: self.registry.profile_name(id, stream.profile),
            level: stream.level,
            decoder_name: self.registry.decoder_name(id),
            embedded_name: &stream.codec_name,
            codec_tag: stream.codec_tag,
        })
    }

    /// Effective bit rate of the stream in bps
    pub fn bit_rate(&self, stream: &StreamFacts) -> i64 {
        compute_bit_rate(
            stream.media_type,
            stream.bit_rate,
            stream.sample_rate,
            stream.channels,
            self.registry.bits_per_sample(&stream.codec_id),
        )
    }

    /// Bits per decoded sample: codec width, then raw sample bits, then the
    /// sample format width
    pub fn sample_bits(&self, stream: &StreamFacts) -> u32 {
        let codec_bits = self.registry.bits_per_sample(&stream.codec_id);
        if codec_bits != 0 {
            codec_bits
        } else if stream.bits_per_raw_sample != 0 {
            stream.bits_per_raw_sample
        } else {
            stream.sample_format.bytes_per_sample() * 8
        }
    }

    /// Describe one stream
    pub fn describe(&self, stream: &StreamFacts) -> String {
        let line = if stream.is_video() {
            self.describe_video(stream)
        } else if stream.is_audio() {
            self.describe_audio(stream)
        } else if stream.is_subtitle() {
            self.describe_subtitle(stream)
        } else {
            format!("Unknown: Stream #{}", stream.index)
        };
        log::debug!("Stream #{} -> {}", stream.index, line);
        line
    }

    /// Write the `title [lang] (` prefix. Returns whether a parenthesis was opened.
    fn open_segment(&self, out: &mut String, stream: &StreamFacts) -> bool {
        let title = stream.title();
        let lang = select_language(stream);

        match (title, lang) {
            (Some(title), Some(lang)) => {
                out.push_str(&format!("{} [{}] (", title, lang));
            }
            (Some(title), None) => {
                out.push_str(&format!("{} (", title));
            }
            (None, Some(lang)) => {
                let shown = if self.config.translate_language {
                    language_display_name(lang, self.languages)
                } else {
                    lang.to_string()
                };
                out.push_str(&format!("{} (", shown));
            }
            (None, None) => return false,
        }
        true
    }

    fn push_bit_rate(&self, out: &mut String, bit_rate: i64) {
        if self.config.show_bit_rate && bit_rate > 0 {
            out.push_str(&format!(", {} kb/s", bit_rate / 1000));
        }
    }

    fn describe_video(&self, stream: &StreamFacts) -> String {
        let mut out = String::from("V: ");
        let opened = self.open_segment(&mut out, stream);

        out.push_str(&self.codec_name(stream));

        if self.config.show_pixel_format {
            if let Some(pix_fmt) = stream.pixel_format.as_deref().filter(|p| !p.is_empty()) {
                out.push_str(&format!(", {}", pix_fmt));
            }
        }
        if stream.width != 0 {
            out.push_str(&format!(", {}x{}", stream.width, stream.height));
        }
        self.push_bit_rate(&mut out, self.bit_rate(stream));

        if opened {
            out.push(')');
        }
        out
    }

    fn describe_audio(&self, stream: &StreamFacts) -> String {
        let mut out = String::from("A: ");
        let opened = self.open_segment(&mut out, stream);

        out.push_str(&self.codec_name(stream));

        if stream.sample_rate != 0 {
            out.push_str(&format!(", {} Hz", stream.sample_rate));
        }
        out.push_str(", ");
        out.push_str(&describe_channel_layout(
            stream.channels,
            stream.channel_layout,
        ));

        let bits = self.sample_bits(stream);
        if stream.codec_id.shows_sample_format() && bits != 0 {
            let kind = if stream.sample_format.is_float() {
                "fp"
            } else {
                "s"
            };
            out.push_str(&format!(", {}{}", kind, bits));
        }
        self.push_bit_rate(&mut out, self.bit_rate(stream));

        if opened {
            out.push(')');
        }
        if stream.disposition.contains(Disposition::DEFAULT) {
            out.push_str(" [default]");
        }
        out
    }

    fn describe_subtitle(&self, stream: &StreamFacts) -> String {
        let mut out = String::from("S: ");
        let opened = self.open_segment(&mut out, stream);

        out.push_str(&self.codec_name(stream));

        if opened {
            out.push(')');
        }

        let flags: Vec<&str> = [
            (Disposition::FORCED, "forced"),
            (Disposition::HEARING_IMPAIRED, "hearing impaired"),
        ]
        .iter()
        .filter(|(flag, _)| stream.disposition.contains(*flag))
        .map(|(_, label)| *label)
        .collect();

        if !flags.is_empty() {
            out.push_str(&format!(" [{}]", flags.join(", ")));
        }
        out
    }
}

/// Describe a stream with the built-in registry and ISO 639 language names
pub fn describe_stream(stream: &StreamFacts) -> String {
    StreamDescriber::default().describe(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_describer() -> StreamDescriber<'static> {
        StreamDescriber::new(&BuiltinCodecRegistry, &NoLanguageNames)
    }

    fn ac3() -> StreamFacts {
        let mut facts = StreamFacts::new(1, MediaType::Audio, CodecId::Ac3);
        facts.sample_rate = 48000;
        facts.channels = 6;
        facts.channel_layout = channel_layout::LAYOUT_5_1;
        facts.bit_rate = 448_000;
        facts
    }

    #[test]
    fn test_bit_rate_pcm_computed() {
        assert_eq!(compute_bit_rate(MediaType::Audio, 0, 48000, 2, 16), 1_536_000);
        assert_eq!(compute_bit_rate(MediaType::Audio, 192_000, 48000, 2, 0), 192_000);
        assert_eq!(compute_bit_rate(MediaType::Video, 5_000_000, 0, 0, 0), 5_000_000);
        assert_eq!(compute_bit_rate(MediaType::Subtitle, 1000, 0, 0, 16), 1000);
        assert_eq!(compute_bit_rate(MediaType::Unknown, 1000, 48000, 2, 16), 0);
    }

    #[test]
    fn test_title_and_language() {
        let facts = ac3()
            .with_metadata("title", "Commentary")
            .with_metadata("language", "eng");
        let line = raw_describer().describe(&facts);
        assert!(line.starts_with("A: Commentary [eng] ("), "{}", line);
        assert!(line.ends_with(')'));
    }

    #[test]
    fn test_title_only() {
        let facts = ac3().with_metadata("title", "Commentary");
        let line = raw_describer().describe(&facts);
        assert!(line.starts_with("A: Commentary ("), "{}", line);
    }

    #[test]
    fn test_language_only_raw_code() {
        let facts = ac3().with_metadata("language", "eng");
        let line = raw_describer().describe(&facts);
        assert!(line.starts_with("A: eng ("), "{}", line);
    }

    #[test]
    fn test_language_only_translated() {
        let facts = ac3().with_metadata("language", "eng");
        let line = StreamDescriber::default().describe(&facts);
        assert!(line.starts_with("A: English ("), "{}", line);

        let untranslated = StreamDescriber::default()
            .with_config(DescriptorConfig::raw())
            .describe(&facts);
        assert!(untranslated.starts_with("A: eng ("), "{}", untranslated);
    }

    #[test]
    fn test_neither_title_nor_language() {
        let line = raw_describer().describe(&ac3());
        assert_eq!(line, "A: AC-3, 48000 Hz, 5.1(side), 448 kb/s");
        assert!(line.starts_with("A: AC-3,"));
        assert!(!line.ends_with(')'));
    }

    #[test]
    fn test_adpcm_bit_rate() {
        let mut facts = StreamFacts::new(3, MediaType::Audio, CodecId::from_name("adpcm_4xm"));
        facts.sample_rate = 48000;
        facts.channels = 1;
        facts.channel_layout = channel_layout::MONO;
        facts.bit_rate = 100_000;
        assert_eq!(
            raw_describer().describe(&facts),
            "A: ADPCM_4XM, 48000 Hz, mono, 100 kb/s"
        );

        let mut facts = StreamFacts::new(3, MediaType::Audio, CodecId::from_name("adpcm_sbpro_2"));
        facts.sample_rate = 48000;
        facts.channels = 1;
        facts.channel_layout = channel_layout::MONO;
        assert_eq!(
            raw_describer().describe(&facts),
            "A: ADPCM_SBPRO_2, 48000 Hz, mono, s2, 96 kb/s"
        );
    }

    #[test]
    fn test_audio_default_flag() {
        let facts = ac3()
            .with_metadata("language", "ger")
            .with_disposition(Disposition::DEFAULT);
        assert_eq!(
            raw_describer().describe(&facts),
            "A: ger (AC-3, 48000 Hz, 5.1(side), 448 kb/s) [default]"
        );
    }

    #[test]
    fn test_audio_pcm_sample_format() {
        let mut facts = StreamFacts::new(2, MediaType::Audio, CodecId::from_name("pcm_s16le"));
        facts.sample_rate = 48000;
        facts.channels = 2;
        facts.channel_layout = channel_layout::STEREO;
        facts.sample_format = SampleFormat::S16;
        assert_eq!(
            raw_describer().describe(&facts),
            "A: PCM_S16LE, 48000 Hz, stereo, s16, 1536 kb/s"
        );
    }

    #[test]
    fn test_audio_lossless_float() {
        let mut facts = StreamFacts::new(2, MediaType::Audio, CodecId::Flac);
        facts.sample_rate = 96000;
        facts.channels = 2;
        facts.sample_format = SampleFormat::Fltp;
        facts.bits_per_raw_sample = 24;
        assert_eq!(
            raw_describer().describe(&facts),
            "A: FLAC, 96000 Hz, 2 channels, fp24"
        );
    }

    #[test]
    fn test_audio_lossy_hides_sample_format() {
        let mut facts = ac3();
        facts.sample_format = SampleFormat::Fltp;
        facts.bits_per_raw_sample = 16;
        assert!(!raw_describer().describe(&facts).contains("fp"));
    }

    #[test]
    fn test_video_line() {
        let mut facts = StreamFacts::new(0, MediaType::Video, CodecId::H264);
        facts.profile = 100;
        facts.level = 41;
        facts.pixel_format = Some("yuv420p".into());
        facts.width = 1920;
        facts.height = 1080;
        facts.bit_rate = 8_000_000;
        assert_eq!(
            raw_describer().describe(&facts),
            "V: H.264 High L4.1, yuv420p, 1920x1080, 8000 kb/s"
        );

        let compact = raw_describer()
            .with_config(DescriptorConfig::compact())
            .describe(&facts);
        assert_eq!(compact, "V: H.264 High L4.1, 1920x1080");
    }

    #[test]
    fn test_video_with_title() {
        let mut facts = StreamFacts::new(0, MediaType::Video, CodecId::Vc1)
            .with_metadata("title", "Main Feature");
        facts.width = 1280;
        facts.height = 720;
        assert_eq!(
            raw_describer().describe(&facts),
            "V: Main Feature (VC-1, 1280x720)"
        );
    }

    #[test]
    fn test_subtitle_flags() {
        let base = StreamFacts::new(3, MediaType::Subtitle, CodecId::HdmvPgsSubtitle);
        let d = raw_describer();

        assert_eq!(d.describe(&base), "S: PGS");

        let both = base
            .clone()
            .with_disposition(Disposition::FORCED | Disposition::HEARING_IMPAIRED);
        assert_eq!(d.describe(&both), "S: PGS [forced, hearing impaired]");

        let hi = base.clone().with_disposition(Disposition::HEARING_IMPAIRED);
        assert_eq!(d.describe(&hi), "S: PGS [hearing impaired]");

        let forced = base
            .with_metadata("language", "fre")
            .with_disposition(Disposition::FORCED);
        assert_eq!(d.describe(&forced), "S: fre (PGS) [forced]");
    }

    #[test]
    fn test_unknown_stream() {
        let facts = StreamFacts::new(7, MediaType::Data, CodecId::None);
        assert_eq!(raw_describer().describe(&facts), "Unknown: Stream #7");
    }

    #[test]
    fn test_describe_stream_never_empty() {
        let facts = StreamFacts::new(0, MediaType::Subtitle, CodecId::None);
        assert_eq!(describe_stream(&facts), "S: [0][0][0][0] / 0x0000");
    }
}
