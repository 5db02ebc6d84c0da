//! Stream language selection and display-name lookup

use super::facts::StreamFacts;

/// Language code used by containers when the language is undetermined
pub const UNDETERMINED: &str = "und";

/// Translates a language code into a display name
pub trait LanguageNames {
    fn display_name(&self, code: &str) -> Option<String>;
}

/// Performs no translation; raw codes are shown
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLanguageNames;

impl LanguageNames for NoLanguageNames {
    fn display_name(&self, _code: &str) -> Option<String> {
        None
    }
}

/// ISO 639-1 / 639-2 (B and T) codes with their English names
static ISO_639: &[(&str, &str, &str, &str)] = &[
    // (639-1, 639-2/B, 639-2/T, name)
    ("ar", "ara", "ara", "Arabic"),
    ("bg", "bul", "bul", "Bulgarian"),
    ("ca", "cat", "cat", "Catalan"),
    ("cs", "cze", "ces", "Czech"),
    ("da", "dan", "dan", "Danish"),
    ("de", "ger", "deu", "German"),
    ("el", "gre", "ell", "Greek"),
    ("en", "eng", "eng", "English"),
    ("es", "spa", "spa", "Spanish"),
    ("et", "est", "est", "Estonian"),
    ("fa", "per", "fas", "Persian"),
    ("fi", "fin", "fin", "Finnish"),
    ("fr", "fre", "fra", "French"),
    ("he", "heb", "heb", "Hebrew"),
    ("hi", "hin", "hin", "Hindi"),
    ("hr", "hrv", "hrv", "Croatian"),
    ("hu", "hun", "hun", "Hungarian"),
    ("id", "ind", "ind", "Indonesian"),
    ("is", "ice", "isl", "Icelandic"),
    ("it", "ita", "ita", "Italian"),
    ("ja", "jpn", "jpn", "Japanese"),
    ("ko", "kor", "kor", "Korean"),
    ("lt", "lit", "lit", "Lithuanian"),
    ("lv", "lav", "lav", "Latvian"),
    ("nl", "dut", "nld", "Dutch"),
    ("no", "nor", "nor", "Norwegian"),
    ("pl", "pol", "pol", "Polish"),
    ("pt", "por", "por", "Portuguese"),
    ("ro", "rum", "ron", "Romanian"),
    ("ru", "rus", "rus", "Russian"),
    ("sk", "slo", "slk", "Slovak"),
    ("sl", "slv", "slv", "Slovenian"),
    ("sr", "srp", "srp", "Serbian"),
    ("sv", "swe", "swe", "Swedish"),
    ("th", "tha", "tha", "Thai"),
    ("tr", "tur", "tur", "Turkish"),
    ("uk", "ukr", "ukr", "Ukrainian"),
    ("vi", "vie", "vie", "Vietnamese"),
    ("zh", "chi", "zho", "Chinese"),
];

/// Built-in ISO 639 lookup (English names)
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso639Names;

impl LanguageNames for Iso639Names {
    fn display_name(&self, code: &str) -> Option<String> {
        let code = code.to_ascii_lowercase();
        ISO_639
            .iter()
            .find(|(one, bib, term, _)| *one == code || *bib == code || *term == code)
            .map(|(_, _, _, name)| name.to_string())
    }
}

/// Pick the stream language: the "language" metadata entry first, then the
/// stream-level field. Empty and undetermined values count as absent.
pub fn select_language(stream: &StreamFacts) -> Option<&str> {
    let lang = stream
        .metadata_value("language")
        .filter(|l| !l.is_empty())
        .or_else(|| stream.language.as_deref().filter(|l| !l.is_empty()))?;

    if lang == UNDETERMINED {
        return None;
    }
    Some(lang)
}

/// Display form of a language code, falling back to the raw code
pub fn language_display_name(code: &str, names: &dyn LanguageNames) -> String {
    names
        .display_name(code)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CodecId, MediaType};

    fn audio() -> StreamFacts {
        StreamFacts::new(1, MediaType::Audio, CodecId::Ac3)
    }

    #[test]
    fn test_metadata_language_preferred() {
        let mut facts = audio().with_metadata("language", "ger");
        facts.language = Some("eng".into());
        assert_eq!(select_language(&facts), Some("ger"));
    }

    #[test]
    fn test_stream_level_fallback() {
        let mut facts = audio();
        facts.language = Some("jpn".into());
        assert_eq!(select_language(&facts), Some("jpn"));

        facts.language = Some(String::new());
        assert_eq!(select_language(&facts), None);
    }

    #[test]
    fn test_empty_metadata_falls_back() {
        let mut facts = audio().with_metadata("language", "");
        facts.language = Some("fre".into());
        assert_eq!(select_language(&facts), Some("fre"));
    }

    #[test]
    fn test_undetermined_suppressed() {
        let facts = audio().with_metadata("language", "und");
        assert_eq!(select_language(&facts), None);

        let mut facts = audio();
        facts.language = Some("und".into());
        assert_eq!(select_language(&facts), None);
    }

    #[test]
    fn test_raw_code_without_translation() {
        assert_eq!(language_display_name("eng", &NoLanguageNames), "eng");
        assert_eq!(language_display_name("xyz", &Iso639Names), "xyz");
    }

    #[test]
    fn test_iso639_lookup() {
        assert_eq!(Iso639Names.display_name("eng").as_deref(), Some("English"));
        assert_eq!(Iso639Names.display_name("deu").as_deref(), Some("German"));
        assert_eq!(Iso639Names.display_name("FR").as_deref(), Some("French"));
        assert_eq!(Iso639Names.display_name("und"), None);
    }
}
