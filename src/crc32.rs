//! CRC-32 as used by PNG chunk trailers
//!
//! Reflected polynomial 0xEDB88320 with initial and final XOR of 0xFFFFFFFF.
//! The lookup table is built at compile time.

const POLYNOMIAL: u32 = 0xedb8_8320;

static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut v = i as u32;
        let mut bit = 0;
        while bit < 8 {
            v = if v & 1 != 0 {
                POLYNOMIAL ^ (v >> 1)
            } else {
                v >> 1
            };
            bit += 1;
        }
        table[i] = v;
        i += 1;
    }
    table
}

/// Incremental CRC-32 hasher
///
/// Feed the chunk type and then the chunk data through `update` to get the
/// same value as hashing their concatenation.
#[derive(Debug, Clone)]
pub struct Crc32 {
    value: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Self { value: 0xffff_ffff }
    }

    pub fn update(&mut self, buf: &[u8]) {
        for &byte in buf {
            self.value = TABLE[((self.value ^ byte as u32) & 0xff) as usize] ^ (self.value >> 8);
        }
    }

    pub fn finalize(&self) -> u32 {
        self.value ^ 0xffff_ffff
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot checksum of `buf`
pub fn checksum(buf: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(buf);
    crc.finalize()
}
