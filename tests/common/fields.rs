//! Synthetic field generators.
//!
//! Global one-degree grids with known analytic patterns, plus helpers that
//! write them in the JSON field format read by the command-line renderer.

#![allow(dead_code)]

use ndarray::Array2;
use serde_json::json;
use std::path::Path;

/// Cell-centered longitudes `0.5, 1.5, ..., 359.5`
pub fn global_lons() -> Vec<f64> {
    (0..360).map(|i| i as f64 + 0.5).collect()
}

/// Cell-centered latitudes `-89.5, ..., 89.5`
pub fn global_lats() -> Vec<f64> {
    (0..180).map(|i| -89.5 + i as f64).collect()
}

/// Surface-pressure-like field in Pa spanning roughly `[95000, 105000]`,
/// with one low and one high outlier cell.
pub fn pressure_field() -> Array2<f64> {
    let lats = global_lats();
    let lons = global_lons();
    let mut field = Array2::from_shape_fn((lats.len(), lons.len()), |(i, j)| {
        let phi = lats[i].to_radians();
        let lambda = lons[j].to_radians();
        100_000.0 + 5_000.0 * (2.0 * phi).sin() * lambda.cos()
    });
    field[[10, 10]] = 80_000.0;
    field[[170, 300]] = 120_000.0;
    field
}

/// Temperature anomaly in K, symmetric about zero
pub fn anomaly_field(ny: usize, nx: usize) -> Array2<f64> {
    Array2::from_shape_fn((ny, nx), |(i, j)| {
        let y = i as f64 / (ny.max(2) - 1) as f64;
        let x = j as f64 / (nx.max(2) - 1) as f64;
        6.0 * (std::f64::consts::PI * x).sin() * (2.0 * y - 1.0)
    })
}

/// Solid-body rotation wind in m/s
pub fn rotating_wind(ny: usize, nx: usize) -> (Array2<f64>, Array2<f64>) {
    let cy = (ny as f64 - 1.0) / 2.0;
    let cx = (nx as f64 - 1.0) / 2.0;
    let u = Array2::from_shape_fn((ny, nx), |(i, _)| -(i as f64 - cy));
    let v = Array2::from_shape_fn((ny, nx), |(_, j)| j as f64 - cx);
    (u, v)
}

/// Write a field in the JSON input format; non-finite values become `null`.
pub fn write_json_field(
    path: &Path,
    data: &Array2<f64>,
    x: Option<&[f64]>,
    y: Option<&[f64]>,
    units: &str,
) -> std::io::Result<()> {
    let rows: Vec<Vec<Option<f64>>> = data
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
        .collect();
    let value = json!({
        "name": "field",
        "data": rows,
        "x": x,
        "y": y,
        "units": units,
    });
    std::fs::write(path, value.to_string())
}
