//! Descriptor configuration

/// Controls which optional segments a descriptor line carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorConfig {
    /// Translate a lone language code into its display name
    pub translate_language: bool,

    /// Show the pixel format of video streams
    pub show_pixel_format: bool,

    /// Show bit rates in kb/s
    pub show_bit_rate: bool,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            translate_language: true,
            show_pixel_format: true,
            show_bit_rate: true,
        }
    }
}

impl DescriptorConfig {
    /// Compact preset for narrow stream menus
    pub fn compact() -> Self {
        Self {
            translate_language: true,
            show_pixel_format: false,
            show_bit_rate: false,
        }
    }

    /// Raw preset: no translation, everything else shown
    pub fn raw() -> Self {
        Self {
            translate_language: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DescriptorConfig::default();
        assert!(config.translate_language);
        assert!(config.show_pixel_format);
        assert!(config.show_bit_rate);
    }

    #[test]
    fn test_presets() {
        let compact = DescriptorConfig::compact();
        assert!(!compact.show_bit_rate);
        assert!(!compact.show_pixel_format);

        let raw = DescriptorConfig::raw();
        assert!(!raw.translate_language);
        assert!(raw.show_bit_rate);
    }
}
