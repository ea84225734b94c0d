//! End-to-end tests: synthetic global fields through level resolution,
//! the plot pipeline and PNG encoding.

mod common;

use common::{assertions, fields};
use gplot::canvas::{encode_png, render, Artist};
use gplot::colormaps::Extend;
use gplot::methods::{Isofill, Quiver, VectorField};
use gplot::{
    compute_range, Figure, GeoBackend, MapProjection, PlainBackend, Plot2D, PlotOptions,
    ScaleOptions, Stage,
};

fn pressure_options() -> ScaleOptions {
    ScaleOptions {
        num: 15,
        ql: Some(0.005),
        qr: Some(0.001),
        ..ScaleOptions::default()
    }
}

#[test]
fn test_pressure_levels_skip_outliers() {
    let field = fields::pressure_field();
    let isofill = Isofill::new(&[field.view().into_dyn()], &pressure_options()).unwrap();
    let scale = &isofill.scale;

    assertions::assert_nice_levels(&scale.levels);
    assert!(scale.levels.len() >= 10 && scale.levels.len() <= 20);
    assertions::assert_in_range(scale.levels[0], 94_000.0, 95_500.0);
    assertions::assert_in_range(*scale.levels.last().unwrap(), 104_500.0, 106_000.0);

    // Both outliers sit outside the levels, so both ends get arrows
    assert_eq!(scale.data_min, 80_000.0);
    assert_eq!(scale.data_max, 120_000.0);
    assert_eq!(scale.extend, Extend::Both);
}

#[test]
fn test_range_quantiles_on_global_grid() {
    let field = fields::pressure_field();
    let range = compute_range(
        &[field.view().into_dyn()],
        None,
        None,
        Some(0.005),
        Some(0.001),
    )
    .unwrap();
    assert_eq!(range.true_min, 80_000.0);
    assert_eq!(range.true_max, 120_000.0);
    assertions::assert_in_range(range.display_min, 95_000.0, 96_000.0);
    assertions::assert_in_range(range.display_max, 104_000.0, 105_000.0);
    assert!(range.exceeds_below() && range.exceeds_above());
}

#[test]
fn test_geo_render_to_png() {
    let field = fields::pressure_field();
    let lons = fields::global_lons();
    let lats = fields::global_lats();

    let mut figure = Figure::new(720, 480, 100.0);
    let id = figure.add_subplot(1, 1, 1).unwrap();
    let method = Isofill::new(&[field.view().into_dyn()], &pressure_options())
        .unwrap()
        .into();
    let mut plot = Plot2D::new(
        GeoBackend::new(MapProjection::Cyl, &lons),
        method,
        field.view().into_dyn(),
        Some(lons),
        Some(lats),
        &figure,
        id,
        PlotOptions::default().with_title("Surface pressure").with_units("Pa"),
    )
    .unwrap();
    plot.draw(&mut figure).unwrap();
    assert_eq!(plot.stage(), Stage::Titled);
    assert!(plot.colorbar().is_some());

    let image = render(&figure).unwrap();
    assert_eq!(image.dimensions(), (720, 480));

    let png = encode_png(&figure).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_missing_values_show_fill_color() {
    let mut field = fields::anomaly_field(40, 60);
    for j in 0..60 {
        field[[0, j]] = f64::NAN;
    }

    let mut figure = Figure::new(400, 300, 100.0);
    let id = figure.add_subplot(1, 1, 1).unwrap();
    let method = Isofill::new(&[field.view().into_dyn()], &ScaleOptions::default())
        .unwrap()
        .into();
    let mut plot = Plot2D::new(
        PlainBackend::default(),
        method,
        field.view().into_dyn(),
        None,
        None,
        &figure,
        id,
        PlotOptions {
            fill_color: [10, 20, 30, 255],
            ..PlotOptions::default()
        },
    )
    .unwrap();
    plot.draw(&mut figure).unwrap();
    assert_eq!(figure.axes(id).unwrap().facecolor, [10, 20, 30, 255]);
    assert!(render(&figure).is_ok());
}

#[test]
fn test_quiver_over_rotating_wind() {
    let (u, v) = fields::rotating_wind(21, 21);
    let x: Vec<f64> = (0..21).map(|i| i as f64).collect();
    let y = x.clone();
    let field = VectorField::new(u, v, x, y).unwrap();

    let mut figure = Figure::new(400, 400, 100.0);
    let id = figure.add_subplot(1, 1, 1).unwrap();
    let quiver = Quiver {
        step: 4,
        ..Quiver::default()
    };
    let mut plot = Plot2D::vector(
        PlainBackend::default(),
        quiver.into(),
        field,
        &figure,
        id,
        PlotOptions::default().with_units("m/s"),
    )
    .unwrap();
    plot.draw(&mut figure).unwrap();

    assert_eq!(plot.grid().x.len(), 6);
    let axes = figure.axes(id).unwrap();
    assert_eq!(
        axes.artists()
            .filter(|a| matches!(a, Artist::QuiverKey(_)))
            .count(),
        1
    );
    assert!(encode_png(&figure).is_ok());
}
