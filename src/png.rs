//! Minimal truecolor PNG encoder and chunk reader
//!
//! Only what the icons need: 8-bit RGB, no interlacing, filter type 0 on
//! every scanline, and exactly one IDAT chunk.

use crate::crc32::Crc32;
use crate::pixels::PixelBuffer;
use anyhow::{Context, Result};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use std::io::{Read, Write};

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

/// Bit depth 8, colour type 2 (truecolor RGB)
const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGB: u8 = 2;

/// Scanline filter type "None"
const FILTER_NONE: u8 = 0;

/// A length-prefixed, CRC-checked PNG block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: [u8; 4],
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(kind: [u8; 4], data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// CRC-32 over the type tag followed by the data
    pub fn crc(&self) -> u32 {
        let mut crc = Crc32::new();
        crc.update(&self.kind);
        crc.update(&self.data);
        crc.finalize()
    }

    /// Bytes this chunk occupies on disk: length, type, data and CRC
    pub fn encoded_len(&self) -> usize {
        4 + 4 + self.data.len() + 4
    }

    pub fn kind_str(&self) -> String {
        String::from_utf8_lossy(&self.kind).into_owned()
    }
}

/// Image header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl Ihdr {
    pub fn rgb8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: BIT_DEPTH,
            color_type: COLOR_TYPE_RGB,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; 13] {
        let mut out = [0u8; 13];
        out[0..4].copy_from_slice(&self.width.to_be_bytes());
        out[4..8].copy_from_slice(&self.height.to_be_bytes());
        out[8] = self.bit_depth;
        out[9] = self.color_type;
        out[10] = self.compression;
        out[11] = self.filter;
        out[12] = self.interlace;
        out
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != 13 {
            anyhow::bail!("IHDR payload must be 13 bytes, got {}", data.len());
        }
        Ok(Self {
            width: read_u32(&data[0..4]),
            height: read_u32(&data[4..8]),
            bit_depth: data[8],
            color_type: data[9],
            compression: data[10],
            filter: data[11],
            interlace: data[12],
        })
    }
}

/// Writes the signature and chunk frames to any `Write` sink in order
pub struct ChunkWriter<W: Write> {
    inner: W,
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_signature(&mut self) -> Result<()> {
        self.inner.write_all(&SIGNATURE)?;
        Ok(())
    }

    pub fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        let len = u32::try_from(chunk.data.len()).context("Chunk data too large")?;
        self.inner.write_all(&len.to_be_bytes())?;
        self.inner.write_all(&chunk.kind)?;
        self.inner.write_all(&chunk.data)?;
        self.inner.write_all(&chunk.crc().to_be_bytes())?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// The three chunks of an icon file, in file order
pub fn build_chunks(pixels: &PixelBuffer) -> Result<[Chunk; 3]> {
    let ihdr = Ihdr::rgb8(pixels.width(), pixels.height());

    let stride = pixels.width() as usize * 3;
    let mut raw = Vec::with_capacity((stride + 1) * pixels.height() as usize);
    for y in 0..pixels.height() {
        raw.push(FILTER_NONE);
        raw.extend_from_slice(pixels.row(y));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish().context("Failed to compress image data")?;

    Ok([
        Chunk::new(IHDR, ihdr.to_bytes().to_vec()),
        Chunk::new(IDAT, compressed),
        Chunk::new(IEND, Vec::new()),
    ])
}

/// Encode `pixels` as a complete PNG stream into `w`
pub fn encode<W: Write>(pixels: &PixelBuffer, w: W) -> Result<W> {
    let mut writer = ChunkWriter::new(w);
    writer.write_signature()?;
    for chunk in build_chunks(pixels)?.iter() {
        writer.write_chunk(chunk)?;
    }
    Ok(writer.into_inner())
}

pub fn encode_to_vec(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    encode(pixels, Vec::new())
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Split a PNG stream into its chunks, checking the signature and every CRC
pub fn read_chunks(bytes: &[u8]) -> Result<Vec<Chunk>> {
    if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
        anyhow::bail!("Missing PNG signature");
    }

    let mut chunks = Vec::new();
    let mut pos = SIGNATURE.len();
    while pos < bytes.len() {
        if bytes.len() - pos < 12 {
            anyhow::bail!("Truncated chunk header at offset {}", pos);
        }
        let len = read_u32(&bytes[pos..pos + 4]) as usize;
        let mut kind = [0u8; 4];
        kind.copy_from_slice(&bytes[pos + 4..pos + 8]);

        let data_start = pos + 8;
        let data_end = data_start
            .checked_add(len)
            .filter(|&end| end + 4 <= bytes.len())
            .with_context(|| {
                format!(
                    "Chunk {} at offset {} runs past end of file",
                    String::from_utf8_lossy(&kind),
                    pos
                )
            })?;

        let chunk = Chunk::new(kind, bytes[data_start..data_end].to_vec());
        let stored = read_u32(&bytes[data_end..data_end + 4]);
        let computed = chunk.crc();
        if stored != computed {
            anyhow::bail!(
                "CRC mismatch in {} chunk: stored {:#010x}, computed {:#010x}",
                chunk.kind_str(),
                stored,
                computed
            );
        }

        pos = data_end + 4;
        let last = chunk.kind == IEND;
        chunks.push(chunk);
        if last {
            break;
        }
    }

    Ok(chunks)
}

/// Inflate the IDAT data of `chunks` into raw scanlines (filter byte included)
pub fn decode_rows(chunks: &[Chunk]) -> Result<Vec<Vec<u8>>> {
    let header = chunks
        .iter()
        .find(|c| c.kind == IHDR)
        .context("No IHDR chunk")?;
    let ihdr = Ihdr::parse(&header.data)?;
    if ihdr.bit_depth != BIT_DEPTH || ihdr.color_type != COLOR_TYPE_RGB {
        anyhow::bail!(
            "Unsupported format: bit depth {}, color type {}",
            ihdr.bit_depth,
            ihdr.color_type
        );
    }

    let stride = (ihdr.width as usize)
        .checked_mul(3)
        .and_then(|n| n.checked_add(1))
        .context("IHDR dimensions overflow")?;
    let expected = stride
        .checked_mul(ihdr.height as usize)
        .context("IHDR dimensions overflow")?;

    let compressed: Vec<u8> = chunks
        .iter()
        .filter(|c| c.kind == IDAT)
        .flat_map(|c| c.data.iter().copied())
        .collect();

    let mut raw = Vec::new();
    ZlibDecoder::new(&compressed[..])
        .read_to_end(&mut raw)
        .context("Failed to inflate IDAT data")?;

    if raw.len() != expected {
        anyhow::bail!("Expected {} bytes of scanlines, got {}", expected, raw.len());
    }

    Ok(raw.chunks(stride).map(<[u8]>::to_vec).collect())
}
