//! # Codec Module
//!
//! Identificatori dei codec supportati e stadio di encoding streaming.
//!
//! ## Codec:
//! - **Gzip** (`.gz`): flate2, header con mtime 0 così l'output è deterministico
//! - **Deflate** (`.zz`): flate2, stream zlib (header + adler32)
//! - **Brotli** (`.br`): brotli, encoder streaming
//!
//! L'ordine `Gzip -> Deflate -> Brotli` è fisso ed è quello con cui i codec
//! vengono eseguiti per ogni file.

use crate::config::{BrotliOptions, CompressOptions, ZlibOptions};
use crate::error::Result;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};

/// Compression algorithm applied to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    Gzip,
    Deflate,
    Brotli,
}

impl Codec {
    /// Every codec, in execution order
    pub const ALL: [Codec; 3] = [Codec::Gzip, Codec::Deflate, Codec::Brotli];

    /// Suffix appended to the source path
    pub fn suffix(&self) -> &'static str {
        match self {
            Codec::Gzip => ".gz",
            Codec::Deflate => ".zz",
            Codec::Brotli => ".br",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Codec::Gzip => "gzip",
            Codec::Deflate => "deflate",
            Codec::Brotli => "brotli",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec-specific tuning record, passed verbatim to the encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecOptions {
    Zlib(ZlibOptions),
    Brotli(BrotliOptions),
}

impl CodecOptions {
    /// Pick the record `codec` uses out of the resolved options
    pub fn for_codec(codec: Codec, options: &CompressOptions) -> Self {
        match codec {
            Codec::Gzip => Self::Zlib(options.gzip_options.clone()),
            Codec::Deflate => Self::Zlib(options.deflate_options.clone()),
            Codec::Brotli => Self::Brotli(options.brotli_options.clone()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Zlib(options) => options.validate(),
            Self::Brotli(options) => options.validate(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        match self {
            Self::Zlib(options) => options.effective_chunk_size(),
            Self::Brotli(options) => options.effective_chunk_size(),
        }
    }
}

/// Stream `reader` through `codec` into `writer`, returning the writer once
/// the encoder has emitted its trailer.
///
/// Buffering is bounded: the reader is drained one chunk at a time and the
/// encoder blocks on `writer` before pulling the next chunk.
pub fn encode<R, W>(codec: Codec, options: &CodecOptions, reader: &mut R, writer: W) -> io::Result<W>
where
    R: Read,
    W: Write,
{
    match (codec, options) {
        (Codec::Gzip, CodecOptions::Zlib(zlib)) => {
            let mut encoder = GzEncoder::new(writer, Compression::new(zlib.effective_level()));
            io::copy(reader, &mut encoder)?;
            encoder.finish()
        }
        (Codec::Deflate, CodecOptions::Zlib(zlib)) => {
            let mut encoder = ZlibEncoder::new(writer, Compression::new(zlib.effective_level()));
            io::copy(reader, &mut encoder)?;
            encoder.finish()
        }
        (Codec::Brotli, CodecOptions::Brotli(brotli_options)) => {
            let mut writer = writer;
            let params = brotli::enc::BrotliEncoderParams {
                quality: brotli_options.effective_quality() as i32,
                lgwin: brotli_options.effective_lgwin() as i32,
                size_hint: brotli_options.size_hint.unwrap_or(0),
                ..Default::default()
            };
            brotli::BrotliCompress(reader, &mut writer, &params)?;
            Ok(writer)
        }
        (codec, _) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} codec received options for another codec", codec),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::{GzDecoder, ZlibDecoder};
    use std::io::Cursor;

    fn sample() -> Vec<u8> {
        "console.log('hello from the bundle');\n".repeat(200).into_bytes()
    }

    fn encode_sample(codec: Codec) -> Vec<u8> {
        let options = CodecOptions::for_codec(codec, &CompressOptions::default());
        encode(codec, &options, &mut Cursor::new(sample()), Vec::new()).unwrap()
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(Codec::Gzip.suffix(), ".gz");
        assert_eq!(Codec::Deflate.suffix(), ".zz");
        assert_eq!(Codec::Brotli.suffix(), ".br");
    }

    #[test]
    fn test_gzip_output_decodes() {
        let compressed = encode_sample(Codec::Gzip);
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
        assert!(compressed.len() < sample().len());

        let mut decoded = Vec::new();
        GzDecoder::new(&compressed[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_deflate_is_zlib_wrapped() {
        let compressed = encode_sample(Codec::Deflate);
        // CMF byte for deflate with a 32K window
        assert_eq!(compressed[0], 0x78);

        let mut decoded = Vec::new();
        ZlibDecoder::new(&compressed[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_brotli_output_decodes() {
        let compressed = encode_sample(Codec::Brotli);

        let mut decoded = Vec::new();
        brotli::Decompressor::new(&compressed[..], 4096)
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_gzip_is_deterministic() {
        assert_eq!(encode_sample(Codec::Gzip), encode_sample(Codec::Gzip));
    }

    #[test]
    fn test_mismatched_options_rejected() {
        let options = CodecOptions::Brotli(BrotliOptions::default());
        let result = encode(Codec::Gzip, &options, &mut Cursor::new(sample()), Vec::new());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_empty_input_still_has_framing() {
        let options = CodecOptions::for_codec(Codec::Gzip, &CompressOptions::default());
        let compressed = encode(Codec::Gzip, &options, &mut Cursor::new(Vec::new()), Vec::new()).unwrap();

        let mut decoded = Vec::new();
        GzDecoder::new(&compressed[..]).read_to_end(&mut decoded).unwrap();
        assert!(decoded.is_empty());
    }
}
