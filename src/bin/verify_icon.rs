use anyhow::{Context, Result};
use ext_icon_gen::png::{self, Ihdr, IHDR};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "icon128.png".to_string());

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to open {}", path))?;
    println!("Checking PNG structure in: {}", path);
    println!("File size: {} bytes", bytes.len());

    let chunks = png::read_chunks(&bytes).context("Malformed PNG")?;

    println!("\nChunks:");
    for chunk in &chunks {
        println!(
            "  {} length={} crc={:#010x} ✓",
            chunk.kind_str(),
            chunk.data.len(),
            chunk.crc()
        );
    }

    let header = chunks
        .iter()
        .find(|c| c.kind == IHDR)
        .context("No IHDR chunk")?;
    let ihdr = Ihdr::parse(&header.data)?;
    println!("\nHeader:");
    println!("  Image dimensions: {}x{}", ihdr.width, ihdr.height);
    println!(
        "  bit depth={} color type={} compression={} filter={} interlace={}",
        ihdr.bit_depth, ihdr.color_type, ihdr.compression, ihdr.filter, ihdr.interlace
    );

    let rows = png::decode_rows(&chunks)?;
    let unfiltered = rows.iter().filter(|row| row[0] == 0).count();
    println!("\nScanlines:");
    println!(
        "  {} rows of {} bytes",
        rows.len(),
        rows.first().map_or(0, Vec::len)
    );
    println!("  {} out of {} rows use filter type 0", unfiltered, rows.len());

    let framed: usize = 8 + chunks.iter().map(|c| c.encoded_len()).sum::<usize>();
    if framed == bytes.len() {
        println!("\n✓ PNG structure is valid");
    } else {
        println!(
            "\n⚠ {} trailing bytes after IEND",
            bytes.len().saturating_sub(framed)
        );
    }

    Ok(())
}
