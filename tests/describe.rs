//! End-to-end checks through the public API

use std::io::Write as _;

use mediadesc_core::descriptor::{channel_layout, BuiltinCodecRegistry, NoLanguageNames};
use mediadesc_core::protocol::{SEEK_FORCE, SEEK_SIZE};
use mediadesc_core::{
    describe_stream, AccessMode, CodecId, DescriptorConfig, Disposition, MediaType,
    ProtocolRegistry, StreamDescriber, StreamFacts, UFile, Whence,
};

fn main_video() -> StreamFacts {
    let mut facts = StreamFacts::new(0, MediaType::Video, CodecId::H264);
    facts.profile = 100;
    facts.level = 41;
    facts.pixel_format = Some("yuv420p".into());
    facts.width = 1920;
    facts.height = 1080;
    facts.bit_rate = 8_000_000;
    facts
}

#[test]
fn test_movie_streams() {
    let video = main_video();
    assert_eq!(
        describe_stream(&video),
        "V: H.264 High L4.1, yuv420p, 1920x1080, 8000 kb/s"
    );

    let mut dts = StreamFacts::new(1, MediaType::Audio, CodecId::Dts)
        .with_metadata("language", "eng")
        .with_disposition(Disposition::DEFAULT);
    dts.profile = 60;
    dts.sample_rate = 48000;
    dts.channels = 6;
    dts.channel_layout = channel_layout::LAYOUT_5_1;
    dts.bit_rate = 3_000_000;
    assert_eq!(
        describe_stream(&dts),
        "A: English (DTS-HD MA, 48000 Hz, 5.1(side), 3000 kb/s) [default]"
    );

    let subs = StreamFacts::new(2, MediaType::Subtitle, CodecId::HdmvPgsSubtitle)
        .with_metadata("language", "ger")
        .with_metadata("title", "Forced")
        .with_disposition(Disposition::FORCED);
    assert_eq!(describe_stream(&subs), "S: Forced [ger] (PGS) [forced]");
}

#[test]
fn test_compact_raw_config() {
    let config = DescriptorConfig {
        translate_language: false,
        ..DescriptorConfig::compact()
    };
    let describer = StreamDescriber::new(&BuiltinCodecRegistry, &NoLanguageNames)
        .with_config(config);

    let video = main_video().with_metadata("language", "jpn");
    assert_eq!(describer.describe(&video), "V: jpn (H.264 High L4.1, 1920x1080)");
}

#[test]
fn test_undetermined_language_hidden() {
    let facts = StreamFacts::new(3, MediaType::Subtitle, CodecId::Srt)
        .with_metadata("language", "und");
    assert_eq!(describe_stream(&facts), "S: SRT");
}

#[test]
fn test_ufile_through_registry() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(b"hello media").unwrap();
    tmp.flush().unwrap();

    let registry = ProtocolRegistry::default();
    let uri = format!("ufile:{}", tmp.path().to_str().unwrap());
    let mut ctx = registry.open(uri.as_bytes(), AccessMode::Read).unwrap();

    let mut buf = [0u8; 5];
    assert_eq!(ctx.read(&mut buf).unwrap(), 5);
    assert_eq!(&buf, b"hello");

    // Size query leaves the position alone
    assert_eq!(ctx.seek(0, Whence::Size).unwrap(), 11);
    assert_eq!(ctx.read(&mut buf).unwrap(), 5);
    assert_eq!(&buf, b" medi");

    assert_eq!(ctx.seek(-1, Whence::End).unwrap(), 10);
    ctx.close().unwrap();
}

#[test]
fn test_ufile_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bin");
    let uri = format!("ufile:{}", path.to_str().unwrap());

    let mut file = UFile::open(&uri, AccessMode::Write).unwrap();
    assert_eq!(file.write(b"abcdef").unwrap(), 6);
    file.close().unwrap();

    let mut file = UFile::open(&uri, AccessMode::Read).unwrap();
    let whence = Whence::from_raw(SEEK_SIZE | SEEK_FORCE).unwrap();
    assert_eq!(file.seek(0, whence).unwrap(), 6);
    assert_eq!(file.seek(2, Whence::Set).unwrap(), 2);

    let mut buf = [0u8; 8];
    assert_eq!(file.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf[..4], b"cdef");
}

#[test]
fn test_ufile_missing() {
    let err = UFile::open("ufile:/nonexistent/dir/file.mkv", AccessMode::Read)
        .err()
        .unwrap();
    assert_eq!(err.to_averror(), -2);
}
