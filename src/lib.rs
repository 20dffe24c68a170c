pub mod crc32;
pub mod icon_gen;
pub mod manifest;
pub mod pixels;
pub mod png;
