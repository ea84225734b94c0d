//! Field loading for the command-line renderer.
//!
//! JSON inputs hold one 2D field with optional coordinates:
//! `{"data": [[..], ..], "x": [..], "y": [..], "units": ".."}`, where
//! `null` marks a missing value. NetCDF inputs are read with the `netcdf`
//! feature.

use ndarray::{Array2, ArrayD};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{GplotError, Result};
use crate::logging::log_field_stats;

/// A loaded field and its coordinates
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    /// Rows along `y`, columns along `x`; leading axes are allowed
    pub data: ArrayD<f64>,
    pub x: Option<Vec<f64>>,
    pub y: Option<Vec<f64>>,
    pub units: String,
}

impl Field {
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }
}

#[derive(Debug, Deserialize)]
struct JsonField {
    #[serde(default)]
    name: Option<String>,
    data: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    x: Option<Vec<f64>>,
    #[serde(default)]
    y: Option<Vec<f64>>,
    #[serde(default)]
    units: String,
}

/// Load a field, choosing the reader from the file extension
pub fn load_field(path: &Path, var: Option<&str>) -> Result<Field> {
    if !path.exists() {
        return Err(GplotError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let field = match extension.as_str() {
        "nc" | "nc4" | "netcdf" => load_netcdf(path, var)?,
        _ => load_json(path)?,
    };
    log_field_stats(
        &path.display().to_string(),
        &field.name,
        field.data.shape(),
        field.missing_count(),
    );
    Ok(field)
}

/// Read a JSON field file
pub fn load_json(path: &Path) -> Result<Field> {
    let content = std::fs::read_to_string(path)?;
    let field = parse_json(&content)?;
    info!("Loaded JSON field: {}", path.display());
    Ok(field)
}

/// Parse the JSON field format
pub fn parse_json(content: &str) -> Result<Field> {
    let raw: JsonField = serde_json::from_str(content)?;
    let nrows = raw.data.len();
    let ncols = raw.data.first().map_or(0, Vec::len);
    if nrows == 0 || ncols == 0 {
        return Err(GplotError::DataNotFound {
            message: "Field data is empty".to_string(),
        });
    }
    if let Some(row) = raw.data.iter().position(|r| r.len() != ncols) {
        return Err(GplotError::shape(format!(
            "Row {} has {} values, expected {}",
            row,
            raw.data[row].len(),
            ncols
        )));
    }

    let values: Vec<f64> = raw
        .data
        .into_iter()
        .flatten()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    let data = Array2::from_shape_vec((nrows, ncols), values)?.into_dyn();
    debug!(nrows = nrows, ncols = ncols, "Parsed JSON field");

    Ok(Field {
        name: raw.name.unwrap_or_else(|| "data".to_string()),
        data,
        x: raw.x,
        y: raw.y,
        units: raw.units,
    })
}

/// Read one variable of a NetCDF file. Without `var`, the first variable
/// with at least two dimensions that is not a coordinate is taken.
#[cfg(feature = "netcdf")]
pub fn load_netcdf(path: &Path, var: Option<&str>) -> Result<Field> {
    use netcdf::AttributeValue;

    let file = netcdf::open(path)?;
    info!("Opened NetCDF file: {}", path.display());

    let variable = match var {
        Some(name) => file.variable(name).ok_or_else(|| GplotError::DataNotFound {
            message: format!("Variable {} not found in {}", name, path.display()),
        })?,
        None => file
            .variables()
            .find(|v| v.dimensions().len() >= 2 && file.dimension(&v.name()).is_none())
            .ok_or_else(|| GplotError::DataNotFound {
                message: format!("No 2D variable found in {}", path.display()),
            })?,
    };

    let dims = variable.dimensions();
    let shape: Vec<usize> = dims.iter().map(|d| d.len()).collect();
    if shape.len() < 2 {
        return Err(GplotError::shape(format!(
            "Variable {} has {} dimensions, expected at least 2",
            variable.name(),
            shape.len()
        )));
    }
    let values: Vec<f64> = variable.get_values::<f64, _>(&[] as &[netcdf::Extent])?;

    let number = |name: &str| -> Option<f64> {
        match variable.attribute(name)?.value().ok()? {
            AttributeValue::Double(v) => Some(v),
            AttributeValue::Float(v) => Some(v as f64),
            AttributeValue::Int(v) => Some(v as f64),
            AttributeValue::Short(v) => Some(v as f64),
            _ => None,
        }
    };
    let fill = number("_FillValue").or_else(|| number("missing_value"));
    let values = values
        .into_iter()
        .map(|v| if Some(v) == fill { f64::NAN } else { v })
        .collect();
    let data = ArrayD::from_shape_vec(shape, values)?;

    let coords = |dim: &netcdf::Dimension| -> Result<Option<Vec<f64>>> {
        match file.variable(&dim.name()) {
            Some(coord) => Ok(Some(coord.get_values::<f64, _>(&[] as &[netcdf::Extent])?)),
            None => Ok(None),
        }
    };
    let y = coords(&dims[dims.len() - 2])?;
    let x = coords(&dims[dims.len() - 1])?;

    let units = match variable.attribute("units").map(|a| a.value()).transpose()? {
        Some(AttributeValue::Str(s)) => s,
        _ => String::new(),
    };

    Ok(Field {
        name: variable.name(),
        data,
        x,
        y,
        units,
    })
}

#[cfg(not(feature = "netcdf"))]
pub fn load_netcdf(_path: &Path, _var: Option<&str>) -> Result<Field> {
    Err(GplotError::CapabilityUnavailable {
        capability: "netcdf".to_string(),
    })
}
