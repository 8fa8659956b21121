use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::{Level, debug};
use volnoise::{
    CellType, NoiseQuality, NoiseType, Quantization, SampleDomain, TextureConfig, VolumeTexture,
    build,
};

// Build a tileable 3D noise volume from a config file and/or flags
#[derive(Parser, Debug)]
#[command(name = "volnoise", version, about)]
struct Cli {
    // JSON TextureConfig; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    noise: Option<NoiseType>,
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    frequency: Option<f64>,
    #[arg(long)]
    lacunarity: Option<f64>,
    #[arg(long)]
    octaves: Option<usize>,
    #[arg(long)]
    persistence: Option<f64>,
    #[arg(long)]
    quality: Option<NoiseQuality>,
    #[arg(long)]
    cell_type: Option<CellType>,
    #[arg(long)]
    displacement: Option<f64>,

    #[arg(long)]
    grid_size: Option<usize>,
    // `--seamless` alone means true; `--seamless false` overrides the config file
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    seamless: Option<bool>,
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    inverse: Option<bool>,
    // raw floor(v * 255) instead of the gradient
    #[arg(long)]
    linear: bool,
    #[arg(long)]
    domain: Option<SampleDomain>,

    // print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,

    // Z slice written by --png (defaults to the middle slice)
    #[arg(long)]
    slice: Option<usize>,
    #[arg(long)]
    png: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn texture_config(&self) -> Result<TextureConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => TextureConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut TextureConfig) {
        let noise = &mut config.noise;
        if let Some(v) = self.noise {
            noise.noise_type = v;
        }
        if let Some(v) = self.seed {
            noise.seed = v;
        }
        if let Some(v) = self.frequency {
            noise.frequency = v;
        }
        if let Some(v) = self.lacunarity {
            noise.lacunarity = v;
        }
        if let Some(v) = self.octaves {
            noise.octaves = v;
        }
        if let Some(v) = self.persistence {
            noise.persistence = v;
        }
        if let Some(v) = self.quality {
            noise.quality = v;
        }
        if let Some(v) = self.cell_type {
            noise.cell_type = v;
        }
        if let Some(v) = self.displacement {
            noise.displacement = Some(v);
        }

        if let Some(v) = self.grid_size {
            config.grid_size = v;
        }
        if let Some(v) = self.domain {
            config.domain = v;
        }
        if let Some(v) = self.seamless {
            config.seamless = v;
        }
        if let Some(v) = self.inverse {
            config.inverse = v;
        }
        if self.linear {
            config.quantization = Quantization::Linear;
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn report(texture: &VolumeTexture, config: &TextureConfig, elapsed_ms: f64) {
    let [w, h, d] = texture.dimensions();
    let (min, max) = texture.value_range();
    let data = texture.data();
    let mean = data.iter().map(|&b| f64::from(b)).sum::<f64>() / data.len() as f64;

    println!(
        "Generated {w}×{h}×{d} {} volume in {elapsed_ms:.2} ms (seed {})",
        config.noise.noise_type, config.noise.seed
    );
    println!("  wrap mode : {:?}", texture.wrap_mode());
    println!("  raw range : {min:.6} .. {max:.6}");
    println!("  byte mean : {mean:.2}");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.texture_config()?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    debug!(?config, "effective configuration");

    let start = Instant::now();
    let texture = build(&config).context("building volume texture")?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    report(&texture, &config, elapsed_ms);

    if let Some(path) = &cli.png {
        let z = cli.slice.unwrap_or(texture.size() / 2);
        let Some(img) = texture.slice_image(z) else {
            bail!("slice {z} is outside a grid of size {}", texture.size());
        };
        img.save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Saved slice {z} to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("volnoise").chain(args.iter().copied())).unwrap()
    }

    fn file_config() -> TextureConfig {
        TextureConfig {
            seamless: true,
            inverse: true,
            ..TextureConfig::default()
        }
    }

    #[test]
    fn flags_can_clear_file_booleans() {
        let mut config = file_config();
        parse(&["--seamless", "false", "--inverse=false"]).apply_overrides(&mut config);
        assert!(!config.seamless);
        assert!(!config.inverse);
    }

    #[test]
    fn bare_flag_sets_true() {
        let mut config = TextureConfig::default();
        parse(&["--seamless", "--inverse"]).apply_overrides(&mut config);
        assert!(config.seamless);
        assert!(config.inverse);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let mut config = file_config();
        parse(&["--seed", "9", "--noise", "ridged-multi"]).apply_overrides(&mut config);
        assert!(config.seamless);
        assert!(config.inverse);
        assert_eq!(config.noise.seed, 9);
        assert_eq!(config.noise.noise_type, NoiseType::RidgedMulti);
    }
}
