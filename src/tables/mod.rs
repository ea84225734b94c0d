//! Named meteorological color-scale tables.
//!
//! The built-in CMA tables are embedded at compile time and parsed once on
//! first access.

pub mod csv_loader;
pub mod level;

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{GplotError, Result};

pub use csv_loader::{from_csv_path, from_csv_str};
pub use level::{Level, LevelColorMap, TickSpacing};

const BUILTIN: [(&str, &str); 8] = [
    ("temp", include_str!("data/temp.csv")),
    ("dtemp", include_str!("data/dtemp.csv")),
    ("temp_ano", include_str!("data/temp_ano.csv")),
    ("pre_level", include_str!("data/pre_level.csv")),
    ("pre_total", include_str!("data/pre_total.csv")),
    ("snow_level", include_str!("data/snow_level.csv")),
    ("pre_ano", include_str!("data/pre_ano.csv")),
    ("rh", include_str!("data/rh.csv")),
];

type Registry = BTreeMap<&'static str, std::result::Result<Arc<LevelColorMap>, String>>;

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    BUILTIN
        .iter()
        .map(|&(name, text)| {
            let parsed = from_csv_str(name, text)
                .map(Arc::new)
                .map_err(|e| e.to_string());
            debug!(table = name, ok = parsed.is_ok(), "Parsed built-in colormap table");
            (name, parsed)
        })
        .collect()
});

/// Look up a built-in table by name
pub fn get(name: &str) -> Result<Arc<LevelColorMap>> {
    match REGISTRY.get(name) {
        Some(Ok(table)) => Ok(table.clone()),
        Some(Err(message)) => Err(GplotError::Colormap {
            message: format!("Built-in table {} is malformed: {}", name, message),
        }),
        None => Err(GplotError::invalid(
            "table",
            format!("Unknown colormap table: {}", name),
        )),
    }
}

/// Names of the built-in tables, sorted
pub fn names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::Extend;

    #[test]
    fn test_all_builtin_tables_parse() {
        assert_eq!(names().len(), BUILTIN.len());
        for name in names() {
            let table = get(name).unwrap();
            assert_eq!(table.name(), name);
            assert!(table.bin_edges().windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(table.bin_edges().len(), table.listed().len() + 1);
        }
    }

    #[test]
    fn test_temp_table() {
        let temp = get("temp").unwrap();
        assert_eq!(temp.unit(), "$^{\\circ}C$");
        assert_eq!(temp.extend(), Extend::Both);
        assert_eq!(temp.bin_edges()[0], -30.0);
        assert_eq!(*temp.bin_edges().last().unwrap(), 40.0);
        assert_eq!(temp.color_of(-45.0), [2, 12, 100, 255]);
        assert_eq!(temp.color_of(41.0), [80, 0, 15, 255]);
        assert_eq!(temp.color_of(1.0), [215, 222, 126, 255]);
    }

    #[test]
    fn test_labeled_tables_use_uniform_ticks() {
        let snow = get("snow_level").unwrap();
        assert_eq!(snow.spacing(), TickSpacing::Uniform);
        assert_eq!(snow.ticks(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(snow.bin_edges(), &[0.5, 1.5, 2.5, 3.5, 4.5]);

        let pre = get("pre_level").unwrap();
        assert_eq!(pre.extend(), Extend::Max);
        assert_eq!(pre.tick_labels().unwrap()[0], "小雨");

        let rh = get("rh").unwrap();
        assert_eq!(rh.extend(), Extend::Neither);
        assert_eq!(rh.spacing(), TickSpacing::Proportional);
    }

    #[test]
    fn test_unknown_table() {
        assert!(matches!(get("nope"), Err(GplotError::InvalidParameter { .. })));
    }
}
