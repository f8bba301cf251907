use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use spritepack_core::{
    imageops, unpack_sprites, util, Algorithm, ExporterManager, Heuristic, PackOptions, Packer,
    UnpackOptions,
};
use tracing::info;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "spritepack",
    about = "Pack sprite images into texture atlases",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a directory of sprites into atlases plus a descriptor
    Pack(PackArgs),
    /// Restore the original sprites from a descriptor and its atlases
    Unpack(UnpackArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input directory containing sprite images
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base name for atlases and descriptor
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// Output image extension (png|jpg|jpeg|bmp|tiff|webp)
    #[arg(long, default_value = "png", help_heading = "Input/Output")]
    img_ext: String,
    /// Descriptor format: json | tpsheet
    #[arg(long, default_value = "json", value_parser = ["json", "tpsheet"], help_heading = "Input/Output")]
    metadata: String,

    /// Maximum atlas width
    #[arg(long, default_value_t = 2048, help_heading = "Layout")]
    max_width: u32,
    /// Maximum atlas height
    #[arg(long, default_value_t = 2048, help_heading = "Layout")]
    max_height: u32,
    /// Shrink each full atlas to its tightest square
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Layout")]
    auto_size: bool,
    /// Padding between sprites in pixels
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    padding: u32,
    /// Allow sprite rotation to save space
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    allow_rotate: bool,
    /// Force power-of-two atlas dimensions
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    pow2: bool,
    /// Sort sprites by area before packing
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Layout")]
    sort: bool,

    /// Trim transparent edges from sprites
    #[arg(long, default_value_t = false, help_heading = "Sprite Processing")]
    trim: bool,
    /// Transparency tolerance for trimming (0-255)
    #[arg(long, default_value_t = 0, help_heading = "Sprite Processing")]
    tolerance: u8,
    /// Detect byte-identical sprites and pack them once
    #[arg(long, default_value_t = false, help_heading = "Sprite Processing")]
    same_detect: bool,

    /// Packing algorithm: basic | skyline | maxrects
    #[arg(long, default_value = "skyline", help_heading = "Algorithms")]
    algorithm: String,
    /// MaxRects heuristic: bssf | blsf | baf | bl | cp
    #[arg(long, default_value = "bssf", help_heading = "Algorithms")]
    heuristic: String,
}

#[derive(Parser, Debug)]
struct UnpackArgs {
    /// Descriptor file to unpack
    descriptor: PathBuf,
    /// Directory holding the atlas images (defaults to the descriptor's)
    #[arg(long)]
    atlas_dir: Option<PathBuf>,
    /// Output directory for the sprites (defaults to the descriptor's)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Unpack(args) => run_unpack(args),
    }
}

fn run_pack(args: &PackArgs) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;

    // unknown names coerce to the documented defaults
    let algorithm: Algorithm = args.algorithm.parse().unwrap_or_default();
    let heuristic: Heuristic = args.heuristic.parse().unwrap_or_default();

    let opts = PackOptions::builder()
        .max_size(args.max_width, args.max_height)
        .auto_size(args.auto_size)
        .padding(args.padding)
        .algorithm(algorithm)
        .heuristic(heuristic)
        .allow_rotate(args.allow_rotate)
        .sort(args.sort)
        .trim(args.trim)
        .tolerance(args.tolerance)
        .same_detect(args.same_detect)
        .power_of_two(args.pow2)
        .name(args.name.clone())
        .img_ext(format!(".{}", args.img_ext.trim_start_matches('.')))
        .build();

    let paths = gather_paths(&args.input)?;
    info!(count = paths.len(), "found sprite files");

    let mut packer = Packer::new(opts)?;
    let out = packer.pack_sprite_files(&args.input, paths)?;

    for (atlas, image) in out.atlas_info.atlases.iter().zip(&out.images) {
        let img_path = args.out_dir.join(&atlas.name);
        imageops::save_image(&img_path, image)
            .with_context(|| format!("write {}", img_path.display()))?;
        info!(path = %img_path.display(), w = atlas.size.w, h = atlas.size.h, "atlas written");
    }

    if out.atlas_info.atlases.is_empty() {
        return Ok(());
    }
    let descriptor_path = args
        .out_dir
        .join(format!("{}.{}", args.name, args.metadata));
    ExporterManager::with_defaults()
        .export_to(&descriptor_path, &out.atlas_info)
        .with_context(|| format!("write {}", descriptor_path.display()))?;
    info!(
        path = %descriptor_path.display(),
        atlases = out.atlas_info.atlases.len(),
        sprites = out
            .atlas_info
            .atlases
            .iter()
            .map(|a| a.sprites.len())
            .sum::<usize>(),
        "descriptor written"
    );
    Ok(())
}

fn run_unpack(args: &UnpackArgs) -> anyhow::Result<()> {
    unpack_sprites(
        &args.descriptor,
        UnpackOptions {
            atlas_dir: args.atlas_dir.clone(),
            output_dir: args.out_dir.clone(),
        },
    )
    .with_context(|| format!("unpack {}", args.descriptor.display()))?;
    Ok(())
}

fn gather_paths(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(input)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_image(e.path()))
        .map(|e| e.into_path())
        .collect();
    util::natural_sort(&mut paths);
    Ok(paths)
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "webp")
    )
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
