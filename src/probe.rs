//! FFmpeg-backed stream probing using ffmpeg-next
//!
//! Populates [`StreamFacts`] from an opened input and resolves decoder and
//! profile names through libavcodec.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;

use ffmpeg_next as ffmpeg;
use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::format::stream::Stream;
use ffmpeg_next::media::Type as FfMediaType;

use crate::descriptor::{
    CodecId, CodecRegistry, Disposition, Iso639Names, MediaType, SampleFormat, StreamDescriber,
    StreamFacts,
};
use crate::error::{Error, Result};

/// Codec registry backed by libavcodec's decoder list and profile tables
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegCodecRegistry;

/// Map our identity back to FFmpeg's through the codec descriptor table
fn av_codec_id(id: &CodecId) -> Option<ffmpeg::ffi::AVCodecID> {
    if *id == CodecId::None {
        return None;
    }
    let name = CString::new(id.name()).ok()?;
    unsafe {
        let desc = ffmpeg::ffi::avcodec_descriptor_get_by_name(name.as_ptr());
        if desc.is_null() {
            None
        } else {
            Some((*desc).id)
        }
    }
}

/// Borrow a string owned by libavcodec's static tables
unsafe fn static_str(ptr: *const c_char) -> Option<&'static str> {
    if ptr.is_null() {
        None
    } else {
        CStr::from_ptr(ptr).to_str().ok()
    }
}

impl CodecRegistry for FfmpegCodecRegistry {
    fn decoder_name<'a>(&'a self, id: &'a CodecId) -> Option<&'a str> {
        let av_id = av_codec_id(id)?;
        let codec = ffmpeg::decoder::find(ffmpeg::codec::Id::from(av_id))?;
        unsafe { static_str((*codec.as_ptr()).name) }
    }

    fn profile_name(&self, id: &CodecId, profile: i32) -> Option<&str> {
        let av_id = av_codec_id(id)?;
        unsafe { static_str(ffmpeg::ffi::avcodec_profile_name(av_id, profile)) }
    }

    fn bits_per_sample(&self, id: &CodecId) -> u32 {
        match av_codec_id(id) {
            Some(av_id) => unsafe { ffmpeg::ffi::av_get_bits_per_sample(av_id).max(0) as u32 },
            None => 0,
        }
    }
}

fn media_type(medium: FfMediaType) -> MediaType {
    match medium {
        FfMediaType::Video => MediaType::Video,
        FfMediaType::Audio => MediaType::Audio,
        FfMediaType::Data => MediaType::Data,
        FfMediaType::Subtitle => MediaType::Subtitle,
        FfMediaType::Attachment => MediaType::Attachment,
        _ => MediaType::Unknown,
    }
}

/// Build stream facts from a demuxed stream
pub fn stream_facts(stream: &Stream) -> Result<StreamFacts> {
    let params = stream.parameters();
    let id = params.id();
    let medium = params.medium();

    let codec_id = CodecId::from_name(id.name());
    let mut facts = StreamFacts::new(stream.index() as i32, media_type(medium), codec_id);

    // The parameters become typed fields once copied into a codec context
    let ctx = CodecContext::from_parameters(params)?;
    let raw = unsafe { &*ctx.as_ptr() };

    facts.bit_rate = raw.bit_rate;
    facts.profile = raw.profile;
    facts.level = raw.level;
    facts.width = raw.width.max(0) as u32;
    facts.height = raw.height.max(0) as u32;
    facts.sample_rate = raw.sample_rate.max(0) as u32;
    facts.channels = raw.ch_layout.nb_channels.max(0) as u32;
    if raw.ch_layout.order == ffmpeg::ffi::AVChannelOrder::AV_CHANNEL_ORDER_NATIVE {
        facts.channel_layout = unsafe { raw.ch_layout.u.mask };
    }
    facts.bits_per_raw_sample = raw.bits_per_raw_sample.max(0) as u32;
    facts.codec_tag = raw.codec_tag;

    let pixel = ffmpeg::format::Pixel::from(raw.pix_fmt);
    if pixel != ffmpeg::format::Pixel::None {
        facts.pixel_format = pixel.descriptor().map(|d| d.name().to_string());
    }

    let sample = ffmpeg::format::Sample::from(raw.sample_fmt);
    if sample != ffmpeg::format::Sample::None {
        facts.sample_format = SampleFormat::from_name(sample.name());
    }

    if id != ffmpeg::codec::Id::None {
        facts.codec_name = id.name().to_string();
    }

    for (key, value) in stream.metadata().iter() {
        facts.metadata.insert(key.to_string(), value.to_string());
    }

    facts.disposition = Disposition::from_bits(stream.disposition().bits() as u32);

    log::trace!("Stream #{} facts: {:?}", facts.index, facts);
    Ok(facts)
}

/// Open a media file and describe every stream in it
pub fn describe_input<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();

    ffmpeg::init().map_err(|e| Error::FFmpeg {
        code: -1,
        message: format!("FFmpeg init failed: {}", e),
    })?;

    let input = ffmpeg::format::input(path).map_err(|e| {
        if e.to_string().contains("No such file") {
            Error::NotFound(path.to_path_buf())
        } else {
            Error::from(e)
        }
    })?;

    log::debug!("Opened {:?} with {} streams", path, input.nb_streams());

    let describer = StreamDescriber::new(&FfmpegCodecRegistry, &Iso639Names);
    input
        .streams()
        .map(|stream| stream_facts(&stream).map(|facts| describer.describe(&facts)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names() {
        ffmpeg::init().unwrap();
        let reg = FfmpegCodecRegistry;
        assert_eq!(reg.decoder_name(&CodecId::Flac), Some("flac"));
        assert_eq!(reg.profile_name(&CodecId::H264, 100), Some("High"));
        assert_eq!(reg.bits_per_sample(&CodecId::from_name("pcm_s16le")), 16);
        assert_eq!(reg.decoder_name(&CodecId::None), None);
    }

    #[test]
    fn test_describe_missing_input() {
        let result = describe_input("/nonexistent/file.mkv");
        assert!(result.is_err());
    }
}
