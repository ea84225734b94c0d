//! # gplot
//!
//! Publication-style 2D map plotting.
//!
//! This library turns gridded fields into filled contours, contour lines,
//! box and mesh fills, hatching, shading, quivers and wind barbs, with
//! colorbars, titles and axis labels that stay consistent across single and
//! multi-panel figures.
//!
//! ## Key Features
//!
//! - **Nice level scales**: round contour levels with a zero-inclusion policy
//! - **Center-aware colormaps**: split or remap a diverging ramp around a pivot
//! - **Robust ranges**: quantile clipping with overflow-arrow detection
//! - **Panel-aware layout**: label sides, panel letters and shared colorbars
//! - **Meteorological tables**: the built-in CMA temperature, precipitation,
//!   snow and humidity color scales
//!
//! ## Architecture
//!
//! - **Descriptors** ([`methods`]): resolve levels, colormap and norm once
//! - **Orchestrator** ([`plot`]): drives one descriptor over one axes
//! - **Backends** ([`backend`]): plain or geographic coordinates
//! - **Scene** ([`canvas`]): in-memory figure model and raster renderer

pub mod backend;
pub mod canvas;
pub mod colormaps;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod interpolation;
pub mod layout;
pub mod levels;
pub mod logging;
pub mod methods;
pub mod plot;
pub mod range;
pub mod tables;

pub use backend::{GeoBackend, MapProjection, PlainBackend, PlotBackend};
pub use canvas::{Figure, Rect};
pub use config::PlotConfig;
pub use error::{GplotError, Result};
pub use levels::{generate_levels, ZeroPolicy};
pub use logging::{init_tracing, log_error, log_timed_operation};
pub use methods::{PlotMethod, ScaleOptions};
pub use plot::{get_slab, Plot2D, PlotOptions, Stage};
pub use range::{compute_range, ValueRange};
