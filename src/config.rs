//! Configuration management for gplot.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. JSON config file (path from `--config` or `GPLOT_CONFIG`)
//! 3. Default values (lowest priority)
//!
//! [`PlotConfig`] is an immutable value; plots take their decoration
//! options from it through [`crate::plot::PlotOptions::from_config`].

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::MapProjection;
use crate::colormaps::{get_colormap, parse_color, DEFAULT_COLORMAP};
use crate::error::{GplotError, Result};
use crate::layout::colorbar::{LegendScope, Orientation};
use crate::layout::geometry::LabelAxes;
use crate::levels::ZeroPolicy;
use crate::methods::MethodKind;

/// Command-line arguments for gplot
#[derive(Parser, Debug)]
#[command(name = "gplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to JSON configuration file
    #[arg(short, long, env = "GPLOT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GPLOT_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print nice contour levels covering a range
    Levels {
        #[arg(allow_negative_numbers = true)]
        lo: f64,
        #[arg(allow_negative_numbers = true)]
        hi: f64,
        /// Target number of levels
        #[arg(short, long, default_value = "15")]
        num: usize,
        /// Zero policy: must-not, may or must
        #[arg(short, long, default_value = "may")]
        zero: ZeroPolicy,
    },
    /// Render a gridded field to PNG
    Render(RenderArgs),
    /// List the built-in colormap tables, or print the edges of one
    Tables {
        name: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// JSON field file, or NetCDF with the `netcdf` feature
    pub input: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Plot method: isofill, isoline, boxfill or pcolor
    #[arg(short, long, default_value = "isofill")]
    pub method: MethodKind,

    /// Variable name inside a NetCDF file
    #[arg(long)]
    pub var: Option<String>,

    /// Target number of levels
    #[arg(short, long)]
    pub num: Option<usize>,

    /// Fraction of values clipped from below
    #[arg(long)]
    pub ql: Option<f64>,

    /// Fraction of values clipped from above
    #[arg(long)]
    pub qr: Option<f64>,

    /// Base colormap
    #[arg(long)]
    pub cmap: Option<String>,

    /// Draw with a built-in level table instead of generated levels
    #[arg(long, conflicts_with_all = ["cmap", "num"])]
    pub table: Option<String>,

    /// Geographic axes
    #[arg(long, conflicts_with = "plain")]
    pub geo: bool,

    /// Plain axes
    #[arg(long)]
    pub plain: bool,

    #[arg(long)]
    pub title: Option<String>,

    /// Colorbar placement: none, local or global
    #[arg(long)]
    pub legend: Option<LegendScope>,

    /// Colorbar orientation: horizontal or vertical
    #[arg(long)]
    pub orientation: Option<Orientation>,

    /// Suppress labels, colorbar and title
    #[arg(long)]
    pub clean: bool,

    /// Equal data aspect ratio along x and y
    #[arg(long)]
    pub fix_aspect: bool,

    /// Silence the range and quantile diagnostics
    #[arg(short, long)]
    pub quiet: bool,

    #[arg(long)]
    pub fontsize: Option<f64>,

    /// Figure size in pixels
    #[arg(long, default_value = "1200")]
    pub width: u32,

    #[arg(long, default_value = "900")]
    pub height: u32,
}

/// Plot defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub legend: LegendScope,
    pub label_axes: LabelAxes,
    pub axes_grid: bool,
    /// Background shown where data is missing
    pub fill_color: String,
    pub projection: MapProjection,
    pub legend_orientation: Orientation,
    pub clean: bool,
    /// Draw on geographic axes
    pub isgeomap: bool,
    pub fix_aspect: bool,
    pub fontsize: f64,
    /// Emit the range and quantile diagnostics
    pub verbose: bool,
    pub default_cmap: String,
    pub num_levels: usize,
    pub log_level: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            legend: LegendScope::Global,
            label_axes: LabelAxes::Auto,
            axes_grid: false,
            fill_color: "0.8".to_string(),
            projection: MapProjection::Cyl,
            legend_orientation: Orientation::Horizontal,
            clean: false,
            isgeomap: true,
            fix_aspect: false,
            fontsize: 8.0,
            verbose: true,
            default_cmap: DEFAULT_COLORMAP.to_string(),
            num_levels: 15,
            log_level: "info".to_string(),
        }
    }
}

impl PlotConfig {
    /// Defaults overlaid with an optional JSON file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PlotConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn merge_cli(mut self, log_level: Option<&str>, render: Option<&RenderArgs>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level.to_string();
        }
        let Some(args) = render else {
            return self;
        };
        if let Some(cmap) = &args.cmap {
            self.default_cmap = cmap.clone();
        }
        if let Some(num) = args.num {
            self.num_levels = num;
        }
        if args.geo {
            self.isgeomap = true;
        }
        if args.plain {
            self.isgeomap = false;
        }
        if let Some(legend) = args.legend {
            self.legend = legend;
        }
        if let Some(orientation) = args.orientation {
            self.legend_orientation = orientation;
        }
        if args.clean {
            self.clean = true;
        }
        if args.fix_aspect {
            self.fix_aspect = true;
        }
        if args.quiet {
            self.verbose = false;
        }
        if let Some(fontsize) = args.fontsize {
            self.fontsize = fontsize;
        }
        self
    }

    /// Subscriber filter: the log level, with the range diagnostics
    /// raised to `warn` unless verbose
    pub fn tracing_filter(&self) -> String {
        if self.verbose {
            self.log_level.clone()
        } else {
            format!("{},gplot::range=warn", self.log_level)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.fontsize > 0.0) {
            return Err(GplotError::Config {
                message: format!("Font size must be positive, got {}", self.fontsize),
            });
        }

        if self.num_levels == 0 {
            return Err(GplotError::Config {
                message: "Level count must be positive".to_string(),
            });
        }

        get_colormap(&self.default_cmap).map_err(|_| GplotError::Config {
            message: format!("Unknown default colormap: {}", self.default_cmap),
        })?;

        parse_color(&self.fill_color).map_err(|_| GplotError::Config {
            message: format!("Invalid fill color: {}", self.fill_color),
        })?;

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(GplotError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PlotConfig::default();
        assert_eq!(config.legend, LegendScope::Global);
        assert_eq!(config.label_axes, LabelAxes::Auto);
        assert_eq!(config.fill_color, "0.8");
        assert_eq!(config.fontsize, 8.0);
        assert_eq!(config.default_cmap, "rdbu_r");
        assert!(config.isgeomap && !config.clean);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"legend": "local", "fontsize": 10.5, "projection": "pacific"}}"#).unwrap();

        let config = PlotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.legend, LegendScope::Local);
        assert_eq!(config.fontsize, 10.5);
        assert_eq!(config.projection, MapProjection::Pacific);
        assert_eq!(config.default_cmap, "rdbu_r");
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from([
            "gplot", "--log-level", "debug", "render", "in.json", "-o", "out.png", "--plain",
            "--cmap", "viridis", "--legend", "none",
        ]);
        let Command::Render(args) = &cli.command else {
            panic!("expected render");
        };
        let config = PlotConfig::default().merge_cli(cli.log_level.as_deref(), Some(args));
        assert_eq!(config.log_level, "debug");
        assert!(!config.isgeomap);
        assert_eq!(config.default_cmap, "viridis");
        assert_eq!(config.legend, LegendScope::None);
        assert_eq!(args.method, MethodKind::Isofill);
    }

    #[test]
    fn test_quiet_and_fix_aspect_flags() {
        let cli = Cli::parse_from([
            "gplot", "render", "in.json", "-o", "out.png", "--quiet", "--fix-aspect",
        ]);
        let Command::Render(args) = &cli.command else {
            panic!("expected render");
        };
        let config = PlotConfig::default().merge_cli(None, Some(args));
        assert!(config.fix_aspect);
        assert!(!config.verbose);
        assert_eq!(config.tracing_filter(), "info,gplot::range=warn");
        assert_eq!(PlotConfig::default().tracing_filter(), "info");

        let options = crate::plot::PlotOptions::from_config(&config).unwrap();
        assert!(options.fix_aspect);
    }

    #[test]
    fn test_levels_accepts_negative_bounds() {
        let cli = Cli::parse_from(["gplot", "levels", "-10", "100", "--num", "5"]);
        match cli.command {
            Command::Levels { lo, hi, num, zero } => {
                assert_eq!((lo, hi, num), (-10.0, 100.0, 5));
                assert_eq!(zero, ZeroPolicy::MayBeLevel);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = PlotConfig::default();
        config.fontsize = 0.0;
        assert!(config.validate().is_err());

        let mut config = PlotConfig::default();
        config.default_cmap = "nope".to_string();
        assert!(config.validate().is_err());

        let mut config = PlotConfig::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = PlotConfig::default();
        config.fill_color = "chartreuse-ish".to_string();
        assert!(config.validate().is_err());
    }
}
