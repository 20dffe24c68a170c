use crate::manifest::{write_manifest, ManifestIcons};
use crate::pixels::{Gradient, IconStyle, PixelBuffer, Rgb};
use crate::png;
use anyhow::{Context, Result};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Icon sizes a browser extension needs: toolbar, extensions page, store
pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];

/// Largest icon edge accepted on the command line
pub const MAX_SIZE: u32 = 4096;

/// Generation settings, filled from the command line by the binary
#[derive(Debug, Clone)]
pub struct Args {
    pub output: PathBuf,
    pub sizes: Vec<u32>,
    pub start_color: String,
    pub end_color: String,
    pub border: u32,
    pub border_color: String,
    pub manifest: bool,
    pub manifest_prefix: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: PathBuf::from("."),
            sizes: DEFAULT_SIZES.to_vec(),
            start_color: "#667eea".to_string(),
            end_color: "#764ba2".to_string(),
            border: 2,
            border_color: "#ffffff".to_string(),
            manifest: false,
            manifest_prefix: "icons/".to_string(),
        }
    }
}

impl Args {
    /// Resolve the colour strings into an `IconStyle`
    pub fn style(&self) -> Result<IconStyle> {
        Ok(IconStyle {
            gradient: Gradient {
                start: Rgb::parse(&self.start_color).context("Invalid --start-color")?,
                end: Rgb::parse(&self.end_color).context("Invalid --end-color")?,
            },
            border: self.border,
            border_color: Rgb::parse(&self.border_color).context("Invalid --border-color")?,
        })
    }
}

/// File name for a square icon of `size` pixels
pub fn icon_filename(size: u32) -> String {
    format!("icon{size}.png")
}

pub fn generate_icons(args: Args) -> Result<Vec<PathBuf>> {
    if args.sizes.is_empty() {
        anyhow::bail!("At least one icon size is required");
    }
    if let Some(size) = args.sizes.iter().find(|&&size| size == 0) {
        anyhow::bail!("Invalid icon size: {}", size);
    }
    if let Some(size) = args.sizes.iter().find(|&&size| size > MAX_SIZE) {
        anyhow::bail!("Icon size {} is larger than the maximum of {}", size, MAX_SIZE);
    }
    for (i, size) in args.sizes.iter().enumerate() {
        if args.sizes[..i].contains(size) {
            anyhow::bail!("Icon size {} is listed more than once", size);
        }
    }
    let style = args.style()?;

    // Ensure the output directory exists
    create_dir_all(&args.output).context("Can't create output directory")?;

    let mut written = Vec::with_capacity(args.sizes.len());
    let mut names = Vec::with_capacity(args.sizes.len());
    for &size in &args.sizes {
        let path = generate_icon(size, &style, &args.output)?;
        let filename = icon_filename(size);
        println!("✓ Created {}", display_path(&args.output, &filename).display());
        names.push((size, filename));
        written.push(path);
    }

    if args.manifest {
        let manifest = ManifestIcons::new(&args.manifest_prefix, &names);
        write_manifest(&args.output, &manifest)?;
        println!("✓ Created {}", display_path(&args.output, "icons.json").display());
    }

    Ok(written)
}

/// Path shown in confirmation lines: bare file name for the current directory
fn display_path(out_dir: &Path, filename: &str) -> PathBuf {
    if out_dir == Path::new(".") {
        PathBuf::from(filename)
    } else {
        out_dir.join(filename)
    }
}

/// Render one `size` x `size` icon and write it to `out_dir`, returning its path
pub fn generate_icon(size: u32, style: &IconStyle, out_dir: &Path) -> Result<PathBuf> {
    let pixels = PixelBuffer::synthesize(size, size, style)?;
    let path = out_dir.join(icon_filename(size));
    write_png(&pixels, &path)?;
    Ok(path)
}

fn write_png(pixels: &PixelBuffer, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = png::encode(pixels, BufWriter::new(file))
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file
        .flush()
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    Ok(())
}
