use crate::core::charset::CharsetVersion;
use crate::core::offset_table::OffsetTables;
use crate::encoders::layout::ChunkLayout;
use crate::error::{Error, Result};
use crate::features::compression::CompressionAlgorithm;

/// Everything a bootstrap needs to rebuild the payload on the target.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapContext<'a> {
    pub encoded: &'a str,
    pub compressed_len: usize,
    pub layout: ChunkLayout,
    pub tables: &'a OffsetTables,
    pub version: &'a CharsetVersion,
    pub algorithm: CompressionAlgorithm,
}

/// Fields recovered from a rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub version: String,
    pub unit_bytes: usize,
    pub unit_chars: usize,
    pub algorithm: CompressionAlgorithm,
    pub compressed_len: usize,
}

/// Produces the program text that decodes, decompresses and runs a payload.
pub trait BootstrapRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Characters that must not appear in the embedded encoded text.
    fn forbidden_chars(&self) -> &[char];

    fn supports(&self, algorithm: CompressionAlgorithm) -> bool;

    fn render(&self, ctx: &BootstrapContext<'_>) -> String;

    /// Recovers the header and the embedded text from a rendered artifact.
    fn parse<'a>(&self, artifact: &'a str) -> Result<(ArtifactHeader, &'a str)>;
}

const HEADER_TAG: &str = "# widebase ";

/// Renders a Python 3 script. The payload sits in a `"..."` literal, so
/// the quote, backslash, line breaks and NUL are reserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonBootstrap;

impl PythonBootstrap {
    /// Standard-library module that undoes `algorithm`.
    fn module(algorithm: CompressionAlgorithm) -> &'static str {
        match algorithm {
            CompressionAlgorithm::Lzma => "lzma",
            CompressionAlgorithm::Gzip => "gzip",
        }
    }
}

impl BootstrapRenderer for PythonBootstrap {
    fn name(&self) -> &'static str {
        "python"
    }

    fn forbidden_chars(&self) -> &[char] {
        &['"', '\\', '\n', '\r', '\0']
    }

    fn supports(&self, _algorithm: CompressionAlgorithm) -> bool {
        true
    }

    fn render(&self, ctx: &BootstrapContext<'_>) -> String {
        let module = Self::module(ctx.algorithm);
        let table = ctx
            .tables
            .decode_table()
            .entries()
            .iter()
            .map(|(upper, offset)| format!("({}, {})", upper, offset))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"# coding:utf8
{tag}{version} {unit_bytes}/{unit_chars} {algorithm}
s="{encoded}"
l={compressed_len}
import {module}
import subprocess
import os

CHARSET_SIZE = {charset_size}
UNIT_CHARS = {unit_chars}
UNIT_BYTES = {unit_bytes}
OFFSET_TABLE = ({table},)


def decode_chunk(chunk_text):
    bigint = 0
    for ch in chunk_text:
        c = ord(ch)
        for upper_bound, offset in OFFSET_TABLE:
            if c <= upper_bound:
                c -= offset
                break
        bigint = bigint * CHARSET_SIZE + c
    return bigint.to_bytes(UNIT_BYTES, "little")


def decode_all(src_text):
    assert len(src_text) % UNIT_CHARS == 0
    return b"".join(
        decode_chunk(src_text[i:i + UNIT_CHARS])
        for i in range(0, len(src_text), UNIT_CHARS)
    )


open("x", "wb").write({module}.decompress(decode_all(s)[:l]))
os.chmod("x", 511)
subprocess.run("./x")
"#,
            tag = HEADER_TAG,
            version = ctx.version,
            unit_bytes = ctx.layout.unit_bytes(),
            unit_chars = ctx.layout.unit_chars(),
            algorithm = ctx.algorithm.as_str(),
            encoded = ctx.encoded,
            compressed_len = ctx.compressed_len,
            module = module,
            charset_size = ctx.layout.charset_size(),
            table = table,
        )
    }

    fn parse<'a>(&self, artifact: &'a str) -> Result<(ArtifactHeader, &'a str)> {
        let header_start = artifact
            .find(HEADER_TAG)
            .ok_or_else(|| Error::malformed("artifact has no widebase header"))?;
        let header_line = artifact[header_start + HEADER_TAG.len()..]
            .lines()
            .next()
            .unwrap_or_default();
        let mut fields = header_line.split_whitespace();
        let (version, units, algorithm) = match (fields.next(), fields.next(), fields.next()) {
            (Some(v), Some(u), Some(a)) => (v, u, a),
            _ => return Err(Error::malformed(format!("bad header line: {}", header_line))),
        };
        let (unit_bytes, unit_chars) = units
            .split_once('/')
            .and_then(|(b, c)| Some((b.parse().ok()?, c.parse().ok()?)))
            .ok_or_else(|| Error::malformed(format!("bad unit pair: {}", units)))?;
        let algorithm: CompressionAlgorithm = algorithm.parse()?;

        let body_start = artifact
            .find("\ns=\"")
            .ok_or_else(|| Error::malformed("artifact has no payload literal"))?
            + 4;
        let body_len = artifact[body_start..]
            .find('"')
            .ok_or_else(|| Error::malformed("payload literal is not terminated"))?;
        let encoded = &artifact[body_start..body_start + body_len];

        let rest = &artifact[body_start + body_len..];
        let len_start = rest
            .find("\nl=")
            .ok_or_else(|| Error::malformed("artifact has no compressed length"))?
            + 3;
        let compressed_len = rest[len_start..]
            .lines()
            .next()
            .and_then(|line| line.trim().parse().ok())
            .ok_or_else(|| Error::malformed("compressed length is not an integer"))?;

        Ok((
            ArtifactHeader {
                version: version.to_string(),
                unit_bytes,
                unit_chars,
                algorithm,
                compressed_len,
            },
            encoded,
        ))
    }
}
