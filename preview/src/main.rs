use std::path::PathBuf;

use anyhow::Context;
use cave_engine::fill::{generate_noise_field_2d, PreviewNoise};
use cave_engine::{CaveConfig, CaveGenerator, NoiseKind};
use clap::{Parser, Subcommand, ValueEnum};

mod preview;
mod ui_strings;

use preview::Report;
use ui_strings::UiStrings;

#[derive(Parser)]
#[command(name = "cave-preview")]
#[command(about = "Generate caves and print a text preview")]
struct Cli {
    /// RON configuration; built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured seed text.
    #[arg(long, global = true)]
    seed: Option<String>,
    /// JSON file with replacement labels.
    #[arg(long, global = true)]
    strings: Option<String>,
    /// Also write the full generation result as JSON.
    #[arg(long, global = true)]
    json: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cellular-automata cave with extruded walls.
    Cave2d,
    /// Marching-cubes cave from a density field.
    Cave3d {
        /// Height of the printed density slice.
        #[arg(long)]
        slice: Option<usize>,
    },
    /// Raw 2D noise field, for comparing noise types.
    Noise {
        #[arg(long, value_enum, default_value = "open-simplex")]
        kind: NoiseArg,
        #[arg(long, default_value_t = 64)]
        width: usize,
        #[arg(long, default_value_t = 24)]
        height: usize,
        #[arg(long, default_value_t = 8)]
        scale: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum NoiseArg {
    Random,
    OpenSimplex,
    Perlin,
    FastSimplex,
}

impl From<NoiseArg> for PreviewNoise {
    fn from(arg: NoiseArg) -> Self {
        match arg {
            NoiseArg::Random => PreviewNoise::PseudoRandom,
            NoiseArg::OpenSimplex => PreviewNoise::Coherent(NoiseKind::OpenSimplex),
            NoiseArg::Perlin => PreviewNoise::Coherent(NoiseKind::Perlin),
            NoiseArg::FastSimplex => PreviewNoise::Coherent(NoiseKind::FastSimplex),
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CaveConfig> {
    let mut config = match &cli.config {
        Some(path) => CaveConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => CaveConfig::default(),
    };
    if let Some(seed) = &cli.seed {
        config.cave_2d.seed = seed.clone();
        config.cave_3d.seed = seed.clone();
    }
    Ok(config)
}

fn write_json(path: &Option<PathBuf>, value: &impl serde::Serialize) -> anyhow::Result<()> {
    if let Some(path) = path {
        let text = serde_json::to_string_pretty(value)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let ui = match &cli.strings {
        Some(path) => ui_strings::load_from_file(path).with_context(|| format!("loading labels from {path}"))?,
        None => UiStrings::default(),
    };
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Cave2d => {
            let cave = CaveGenerator::new(config)?.generate_2d()?;
            println!("{}\n{}", ui.map.title_2d, cave.field.to_ascii());
            print!("{}", Report::for_2d(&cave).render(&ui));
            write_json(&cli.json, &cave)?;
        }
        Commands::Cave3d { slice } => {
            let max_value = config.cave_3d.max_value;
            let cave = CaveGenerator::new(config)?.generate_3d()?;
            let y = slice.unwrap_or(cave.field.height() / 2);
            let layer = preview::horizontal_slice(&cave.field, y)?;
            println!("{} y={y}\n{}", ui.map.slice, preview::shade_layer(&layer, 0, max_value));
            print!("{}", Report::for_3d(&cave).render(&ui));
            write_json(&cli.json, &cave)?;
        }
        Commands::Noise { kind, width, height, scale } => {
            let max_value = config.cave_3d.max_value;
            let field = generate_noise_field_2d(*width, *height, config.cave_3d.seed(), *scale, max_value, (*kind).into())?;
            println!("{}\n{}", ui.map.title_noise, preview::shade_layer(&field, 0, max_value));
            write_json(&cli.json, &field)?;
        }
    }
    Ok(())
}
