//! gplot - publication-style 2D map plotting
//!
//! Command-line entry point: level scales, table listings and PNG rendering
//! of JSON or NetCDF fields.

use anyhow::Context;
use clap::Parser;
use ndarray::Array2;
use tracing::info;

use gplot::canvas::save_png;
use gplot::colormaps::get_colormap;
use gplot::config::{Cli, Command, RenderArgs};
use gplot::data_loader::load_field;
use gplot::methods::{Boxfill, Isofill, Isoline, MethodKind, Pcolor};
use gplot::{
    generate_levels, get_slab, init_tracing, log_error, tables, Figure, GeoBackend, GplotError,
    PlainBackend, Plot2D, PlotBackend, PlotConfig, PlotMethod, PlotOptions, ScaleOptions,
    ZeroPolicy,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = PlotConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let render = match &cli.command {
        Command::Render(args) => Some(args),
        _ => None,
    };
    let config = config.merge_cli(cli.log_level.as_deref(), render);

    init_tracing(&config.tracing_filter());
    info!("Starting gplot v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        log_error(&e, "configuration");
        e
    })?;

    match cli.command {
        Command::Levels { lo, hi, num, zero } => print_levels(lo, hi, num, zero)?,
        Command::Tables { name } => print_tables(name.as_deref())?,
        Command::Render(args) => render_field(&args, &config).map_err(|e| {
            log_error(&e, "render");
            e
        })?,
    }
    Ok(())
}

fn print_levels(lo: f64, hi: f64, num: usize, zero: ZeroPolicy) -> anyhow::Result<()> {
    let levels = generate_levels(lo, hi, num, zero)?;
    for level in levels {
        println!("{}", level);
    }
    Ok(())
}

fn print_tables(name: Option<&str>) -> anyhow::Result<()> {
    let Some(name) = name else {
        for name in tables::names() {
            let table = tables::get(name)?;
            println!("{}\t{}", name, table.description());
        }
        return Ok(());
    };
    let table = tables::get(name).with_context(|| format!("Cannot show table {}", name))?;
    println!("# {} ({})", table.description(), table.unit());
    for edge in table.bin_edges() {
        println!("{}", edge);
    }
    Ok(())
}

fn build_method(args: &RenderArgs, config: &PlotConfig, slab: &Array2<f64>) -> gplot::Result<PlotMethod> {
    if let Some(name) = &args.table {
        return Ok(PlotMethod::from_table(tables::get(name)?));
    }
    let opts = ScaleOptions {
        num: config.num_levels,
        ql: args.ql,
        qr: args.qr,
        cmap: Some(get_colormap(&config.default_cmap)?),
        ..ScaleOptions::default()
    };
    let vars = [slab.view().into_dyn()];
    let method = match args.method {
        MethodKind::Isofill => Isofill::new(&vars, &opts)?.into(),
        MethodKind::Isoline => Isoline::new(&vars, &opts)?.into(),
        MethodKind::Boxfill => Boxfill::new(&vars, &opts)?.into(),
        MethodKind::Pcolor => Pcolor::new(&vars, &opts)?.into(),
        other => {
            return Err(GplotError::invalid(
                "method",
                format!("{} cannot be rendered from a single field", other),
            ))
        }
    };
    Ok(method)
}

fn draw_with<B: PlotBackend>(
    backend: B,
    method: PlotMethod,
    slab: &Array2<f64>,
    x: Option<Vec<f64>>,
    y: Option<Vec<f64>>,
    options: PlotOptions,
    figure: &mut Figure,
) -> gplot::Result<()> {
    let axes = figure.add_subplot(1, 1, 1)?;
    let mut plot = Plot2D::new(backend, method, slab.view().into_dyn(), x, y, figure, axes, options)?;
    plot.draw(figure)?;
    Ok(())
}

fn render_field(args: &RenderArgs, config: &PlotConfig) -> gplot::Result<()> {
    let field = load_field(&args.input, args.var.as_deref())?;
    let slab = get_slab(field.data.view())?;
    let method = build_method(args, config, &slab)?;

    let mut options = PlotOptions::from_config(config)?.with_units(field.units.clone());
    options.title = args.title.clone();

    let mut figure = Figure::new(args.width, args.height, 100.0);
    if config.isgeomap {
        let lons = field
            .x
            .clone()
            .unwrap_or_else(|| (0..slab.ncols()).map(|i| i as f64).collect());
        let backend = GeoBackend::new(config.projection, &lons);
        draw_with(backend, method, &slab, Some(lons), field.y.clone(), options, &mut figure)?;
    } else {
        draw_with(
            PlainBackend::default(),
            method,
            &slab,
            field.x.clone(),
            field.y.clone(),
            options,
            &mut figure,
        )?;
    }

    save_png(&figure, &args.output)?;
    info!("Wrote {}", args.output.display());
    Ok(())
}

