use anyhow::Result;
use clap::Parser;
use ext_icon_gen::icon_gen;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "ext-icon-gen",
    about = "Generate gradient PNG icons for a browser extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Icon sizes to generate, one icon<SIZE>.png each.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        default_values_t = icon_gen::DEFAULT_SIZES
    )]
    sizes: Vec<u32>,

    /// Gradient colour at the left edge (CSS color format)
    #[clap(long, default_value = "#667eea")]
    start_color: String,

    /// Gradient colour towards the right edge (CSS color format)
    #[clap(long, default_value = "#764ba2")]
    end_color: String,

    /// Border width in pixels
    #[clap(long, value_name = "PX", default_value_t = 2)]
    border: u32,

    /// Border colour (CSS color format)
    #[clap(long, default_value = "#ffffff")]
    border_color: String,

    /// Also write icons.json with the manifest "icons" and "action" entries
    #[clap(long)]
    manifest: bool,

    /// Path prefix for icon files inside icons.json
    #[clap(long, value_name = "PREFIX", default_value = "icons/")]
    manifest_prefix: String,
}

impl From<Args> for icon_gen::Args {
    fn from(args: Args) -> Self {
        Self {
            output: args.output,
            sizes: args.sizes,
            start_color: args.start_color,
            end_color: args.end_color,
            border: args.border,
            border_color: args.border_color,
            manifest: args.manifest,
            manifest_prefix: args.manifest_prefix,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args.into())?;
    Ok(())
}
