use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_PATH: &str = "pibench.json";

/// Benchmark timing and window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Seconds each demo runs before the next one starts
    pub demo_duration: f32,
    /// Sampling windows discarded at the start of each demo
    pub warm_up_windows: u32,
    /// Seconds per sampling window
    pub sample_interval: f64,
    pub vsync: bool,
    /// Integer window scale; the canvas is always 640x480
    pub scale: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            demo_duration: 15.0,
            warm_up_windows: 2,
            sample_interval: 1.0,
            vsync: true,
            scale: 1,
        }
    }
}

impl BenchConfig {
    /// Load config from a JSON file; missing keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(self.demo_duration.is_finite() && self.demo_duration > 0.0) {
            bail!("demo_duration must be positive, got {}", self.demo_duration);
        }
        if !(self.sample_interval.is_finite() && self.sample_interval > 0.0) {
            bail!("sample_interval must be positive, got {}", self.sample_interval);
        }
        if self.scale == 0 {
            bail!("scale must be at least 1");
        }
        Ok(())
    }
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the timed benchmark cycle
    Bench(BenchConfig),
    /// Render one generator continuously
    Preview { config: BenchConfig, demo: String },
    Help,
}

pub const USAGE: &str = "\
Usage: pibench [OPTIONS]

Options:
  --config PATH       Load settings from a JSON file (default: pibench.json if present)
  --duration SECS     Seconds per demo (default: 15)
  --warm-up N         Sampling windows ignored after each demo starts (default: 2)
  --scale N           Integer window scale (default: 1)
  --no-vsync          Disable VSync for uncapped framerate
  --preview NAME      Loop a single demo: helix, laser, radial, noise, test
  --help              Show this help message

Controls:
  Enter/Space         Start or restart the benchmark
  Left/Right          Cycle demos (preview mode)
  Escape              Quit";

fn value<'a>(flag: &str, args: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<&'a str> {
    args.next()
        .with_context(|| format!("{} expects a value", flag))
}

fn number<T: std::str::FromStr>(flag: &str, raw: &str) -> anyhow::Result<T> {
    raw.parse()
        .ok()
        .with_context(|| format!("{} expects a number, got '{}'", flag, raw))
}

/// Parse command line arguments (without the program name).
///
/// The config file is read first so flags always win, whatever their order.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> anyhow::Result<Command> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

    let mut config_path: Option<PathBuf> = None;
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        match arg {
            "--help" => return Ok(Command::Help),
            "--config" => config_path = Some(PathBuf::from(value(arg, &mut iter)?)),
            _ => {},
        }
    }

    let mut config = match config_path {
        Some(path) => BenchConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => BenchConfig::load(DEFAULT_CONFIG_PATH)?,
        None => BenchConfig::default(),
    };
    let mut preview = None;

    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        match arg {
            "--no-vsync" => config.vsync = false,
            "--config" => {
                iter.next();
            },
            "--duration" => config.demo_duration = number(arg, value(arg, &mut iter)?)?,
            "--warm-up" => config.warm_up_windows = number(arg, value(arg, &mut iter)?)?,
            "--scale" => config.scale = number(arg, value(arg, &mut iter)?)?,
            "--preview" => preview = Some(value(arg, &mut iter)?.to_string()),
            other => bail!("unknown option '{}' (try --help)", other),
        }
    }
    config.validate()?;

    Ok(match preview {
        Some(demo) => Command::Preview { config, demo },
        None => Command::Bench(config),
    })
}
