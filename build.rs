//! Build script for mediadesc-core
//!
//! This script:
//! 1. Locates FFmpeg libraries using pkg-config (only with the `ffmpeg` feature)
//! 2. Generates the C header using cbindgen

use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => dir,
        Err(_) => {
            println!("cargo:warning=OUT_DIR not set, skipping header generation");
            return;
        }
    };
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());

    if env::var_os("CARGO_FEATURE_FFMPEG").is_some() {
        find_ffmpeg_libs();
    }

    generate_header(&manifest_dir, &out_dir);
}

/// Find FFmpeg libraries using pkg-config or fallback paths
fn find_ffmpeg_libs() {
    let libs = ["libavcodec", "libavformat", "libavutil"];

    let mut found_all = true;
    for lib in &libs {
        match pkg_config::Config::new()
            .atleast_version("58.0.0") // FFmpeg 6.0+
            .probe(lib)
        {
            Ok(library) => {
                println!("cargo:info=Found {} via pkg-config", lib);
                for path in &library.link_paths {
                    println!("cargo:rustc-link-search=native={}", path.display());
                }
            }
            Err(e) => {
                println!("cargo:warning=pkg-config failed for {}: {}", lib, e);
                found_all = false;
            }
        }
    }

    if !found_all {
        try_fallback_paths();
    }
}

/// Try common FFmpeg installation paths
fn try_fallback_paths() {
    let lib_paths = [
        "/opt/homebrew/opt/ffmpeg/lib",
        "/usr/local/opt/ffmpeg/lib",
        "/usr/local/lib",
        "/usr/lib/x86_64-linux-gnu",
    ];

    for path in &lib_paths {
        if Path::new(path).exists() {
            println!("cargo:rustc-link-search=native={}", path);
            println!("cargo:info=Added link path: {}", path);
        }
    }

    println!("cargo:rustc-link-lib=dylib=avcodec");
    println!("cargo:rustc-link-lib=dylib=avformat");
    println!("cargo:rustc-link-lib=dylib=avutil");
}

/// Generate C header using cbindgen
fn generate_header(manifest_dir: &str, out_dir: &str) {
    let crate_dir = PathBuf::from(manifest_dir);
    let config_path = crate_dir.join("cbindgen.toml");
    let header_out = PathBuf::from(out_dir).join("mediadesc.h");

    let config = if config_path.exists() {
        cbindgen::Config::from_file(&config_path).unwrap_or_default()
    } else {
        cbindgen::Config::default()
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&header_out);
            println!("cargo:info=Generated header: {}", header_out.display());
        }
        Err(e) => {
            println!("cargo:warning=cbindgen failed: {}", e);
            create_fallback_header(&header_out);
        }
    }
}

/// Create a minimal fallback header if cbindgen fails
fn create_fallback_header(header_path: &Path) {
    let header_content = r#"
#ifndef MEDIADESC_H
#define MEDIADESC_H

#include <stdint.h>
#include <stdbool.h>
#include <stddef.h>

// Note: This is a fallback header. Build with cbindgen for full API.

typedef enum {
    MdcResultSuccess = 0,
    MdcResultErrorInvalidPointer = 1,
    MdcResultErrorNotFound = 2,
    MdcResultErrorInvalidArgument = 3,
    MdcResultErrorIo = 4,
    MdcResultErrorMemory = 5,
    MdcResultErrorFFmpeg = 6,
    MdcResultErrorUnknown = 99,
} MdcResult;

typedef struct {
    bool translate_language;
    bool show_pixel_format;
    bool show_bit_rate;
} MdcDescriptorConfig;

typedef struct {
    int32_t index;
    int32_t media_type;
    const char* codec_id;
    const char* codec_name;
    int64_t bit_rate;
    int32_t profile;
    int32_t level;
    const char* pixel_format;
    uint32_t width;
    uint32_t height;
    uint32_t sample_rate;
    uint32_t channels;
    uint64_t channel_layout;
    const char* sample_format;
    uint32_t bits_per_raw_sample;
    uint32_t codec_tag;
    const char* language;
    const char* metadata_language;
    const char* title;
    uint32_t disposition;
} MdcStreamFacts;

typedef struct MdcUFileHandle MdcUFileHandle;

typedef struct {
    const char* name;
    int32_t (*url_open)(MdcUFileHandle** out, const char* uri, int32_t flags);
    int32_t (*url_read)(MdcUFileHandle* h, uint8_t* buf, int32_t size);
    int32_t (*url_write)(MdcUFileHandle* h, const uint8_t* buf, int32_t size);
    int64_t (*url_seek)(MdcUFileHandle* h, int64_t pos, int32_t whence);
    int32_t (*url_close)(MdcUFileHandle* h);
    intptr_t (*url_get_file_handle)(MdcUFileHandle* h);
} MdcUrlProtocol;

// Error handling
const char* mdc_get_last_error(void);
void mdc_clear_last_error(void);

// Library
void mdc_init(void);
const char* mdc_get_version(void);

// Stream descriptors
MdcResult mdc_describe_stream(const MdcStreamFacts* facts,
                              const MdcDescriptorConfig* config,
                              char** out_name);
void mdc_string_free(char* s);

// ufile protocol
const MdcUrlProtocol* mdc_ufile_protocol(void);
int32_t mdc_ufile_open(MdcUFileHandle** out_handle, const char* uri, int32_t flags);
int32_t mdc_ufile_read(MdcUFileHandle* handle, uint8_t* buf, int32_t size);
int32_t mdc_ufile_write(MdcUFileHandle* handle, const uint8_t* buf, int32_t size);
int64_t mdc_ufile_seek(MdcUFileHandle* handle, int64_t pos, int32_t whence);
int32_t mdc_ufile_close(MdcUFileHandle* handle);
intptr_t mdc_ufile_get_handle(MdcUFileHandle* handle);

#endif // MEDIADESC_H
"#;

    match std::fs::write(header_path, header_content) {
        Ok(()) => println!("cargo:info=Created fallback header: {}", header_path.display()),
        Err(e) => println!("cargo:warning=Failed to write fallback header: {}", e),
    }
}
