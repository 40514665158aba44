use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wavegrid_layout::{FlowLayoutConfig, SpringLayoutConfig};

use crate::catalog::Catalog;
use crate::error::{HarnessError, Result};
use crate::session::{DragScript, Session};

#[derive(Debug, Parser)]
#[command(
    name = "wavegrid-harness",
    about = "Play a scripted drag-scroll session against the spring grid layout",
    version
)]
pub struct Cli {
    /// Seed for the sample catalog's weights.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Frames with the finger down.
    #[arg(long, default_value_t = 45)]
    pub frames: usize,

    /// Content offset change per frame; negative scrolls back up.
    #[arg(long, default_value_t = 12.0, allow_hyphen_values = true)]
    pub speed: f64,

    /// Content offset before the drag.
    #[arg(long, default_value_t = 600.0)]
    pub start: f64,

    /// Section header height; 0 disables headers.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub header_height: f64,

    /// Layout config file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit one JSON object per frame on stdout instead of log lines.
    #[arg(long)]
    pub json: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);
    run(cli)
}

fn init_tracing(json: bool) {
    let default = if json { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: Option<&Path>) -> Result<SpringLayoutConfig> {
    let Some(path) = path else {
        return Ok(SpringLayoutConfig::default());
    };
    if !path.exists() {
        return Err(HarnessError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => SpringLayoutConfig::from_json_file(path)?,
        _ => SpringLayoutConfig::from_toml_file(path)?,
    };
    tracing::info!(path = %path.display(), "loaded layout config");
    Ok(config)
}

pub fn run(cli: Cli) -> Result<()> {
    if !(cli.header_height >= 0.0 && cli.header_height.is_finite()) {
        return Err(HarnessError::invalid_argument(format!(
            "header height must be >= 0, got {}",
            cli.header_height
        )));
    }
    let config = load_config(cli.config.as_deref())?;

    let catalog = Catalog::sample(cli.seed);
    let script = DragScript {
        speed: cli.speed,
        drag_frames: cli.frames,
        start_offset: cli.start,
        ..DragScript::default()
    };
    let flow = FlowLayoutConfig {
        header_height: cli.header_height,
        ..FlowLayoutConfig::default()
    };
    tracing::info!(
        seed = cli.seed,
        items = catalog.item_count(),
        frames = cli.frames,
        speed = cli.speed,
        "starting session"
    );

    let layout = catalog.flow_layout(flow, script.viewport.width);
    let report = Session::new(layout, config, script)?.run();

    if cli.json {
        let mut stdout = std::io::stdout().lock();
        for frame in &report.frames {
            serde_json::to_writer(&mut stdout, frame)?;
            writeln!(stdout)?;
        }
    } else {
        tracing::info!(
            frames = report.frames.len(),
            settled_after = ?report.settled_after,
            peak_displacement = report.peak_displacement,
            "session finished"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("wavegrid-harness").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.frames, 45);
        assert!(!cli.json);
        assert!(cli.config.is_none());
    }

    #[test]
    fn negative_speed_parses() {
        let cli = cli(&["--speed", "-8", "--start", "1200"]);
        assert_eq!(cli.speed, -8.0);
        assert_eq!(cli.start, 1200.0);
    }

    #[test]
    fn missing_config_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/wavegrid.toml"))).unwrap_err();
        assert!(matches!(err, HarnessError::MissingPath { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn negative_header_rejected() {
        let err = run(cli(&["--header-height", "-1", "--json"])).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArgument { .. }));
    }

    #[test]
    fn default_config_without_path() {
        assert_eq!(load_config(None).unwrap(), SpringLayoutConfig::default());
    }
}
