//! Level tables from CSV text.
//!
//! ```text
//! description=<text>
//! unit=<text>
//! vmin, vmax, r, g, b, label
//! None, -30, 2, 12, 100,
//! -30,  -28, 7, 30, 120,
//! ```
//!
//! `None` opens a bound; reading stops at the first blank line.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{GplotError, Result};

use super::level::{Level, LevelColorMap};

fn header_value<'a>(line: Option<&'a str>, key: &str) -> Result<&'a str> {
    let line = line.ok_or_else(|| GplotError::Colormap {
        message: format!("Missing '{}=' header line", key),
    })?;
    line.trim()
        .split_once('=')
        .filter(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim())
        .ok_or_else(|| GplotError::Colormap {
            message: format!("Expected '{}=' header, got '{}'", key, line.trim()),
        })
}

/// Strip `r'..'` raw-string wrappers and quotes from a unit string
fn clean_unit(raw: &str) -> String {
    let unit = match raw.strip_prefix("r'").and_then(|u| u.strip_suffix('\'')) {
        Some(inner) => inner,
        None => raw,
    };
    unit.trim_matches('\'').to_string()
}

fn parse_bound(field: &str, row: usize) -> Result<Option<f64>> {
    if field == "None" {
        return Ok(None);
    }
    field
        .parse::<f64>()
        .map(Some)
        .map_err(|_| GplotError::Colormap {
            message: format!("Row {}: invalid bound '{}'", row, field),
        })
}

fn parse_channel(field: &str, row: usize) -> Result<u8> {
    field.parse::<u8>().map_err(|_| GplotError::Colormap {
        message: format!("Row {}: invalid color channel '{}'", row, field),
    })
}

fn parse_row(record: &StringRecord, row: usize) -> Result<Level> {
    if record.len() < 5 {
        return Err(GplotError::Colormap {
            message: format!("Row {}: expected 6 fields, got {}", row, record.len()),
        });
    }
    Ok(Level::new(
        parse_bound(&record[0], row)?,
        parse_bound(&record[1], row)?,
        [
            parse_channel(&record[2], row)?,
            parse_channel(&record[3], row)?,
            parse_channel(&record[4], row)?,
        ],
        record.get(5).unwrap_or(""),
    ))
}

/// Parse a level table from CSV text
pub fn from_csv_str(name: &str, text: &str) -> Result<LevelColorMap> {
    let mut lines = text.lines();
    let description = header_value(lines.next(), "description")?.to_string();
    let unit = clean_unit(header_value(lines.next(), "unit")?);

    let body: Vec<&str> = lines.take_while(|l| !l.trim().is_empty()).collect();
    let body = body.join("\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut levels = Vec::new();
    for (row, record) in reader.records().enumerate() {
        levels.push(parse_row(&record?, row + 1)?);
    }

    LevelColorMap::new(name, unit, description, levels)
}

/// Read a level table from a CSV file; the table is named after the file stem
pub fn from_csv_path(path: &Path) -> Result<LevelColorMap> {
    let text = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    from_csv_str(&name, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::Extend;
    use std::io::Write;

    const SNOW: &str = "description=积雪分布图配色表
unit=r'cm'
vmin , vmax , r   , g   , b   , label
0    , 5    , 151 , 232 , 173 ,
5    , 10   , 155 , 188 , 232 ,
10   , 15   , 59  , 126 , 219 ,
50   , None , 200 , 17  , 169 ,

ignored , after , blank , line , , ,
";

    #[test]
    fn test_parse_table() {
        let cmap = from_csv_str("snow", SNOW).unwrap();
        assert_eq!(cmap.description(), "积雪分布图配色表");
        assert_eq!(cmap.unit(), "cm");
        assert_eq!(cmap.levels().len(), 4);
        assert_eq!(cmap.extend(), Extend::Max);
        assert_eq!(cmap.bin_edges(), &[0.0, 5.0, 10.0, 15.0]);
        assert_eq!(cmap.levels()[3].rgb, [200, 17, 169]);
    }

    #[test]
    fn test_clean_unit() {
        assert_eq!(clean_unit("r'$^\\circ$C'"), "$^\\circ$C");
        assert_eq!(clean_unit("'mm'"), "mm");
        assert_eq!(clean_unit("%"), "%");
    }

    #[test]
    fn test_bad_rows() {
        let text = "description=x\nunit=y\nvmin,vmax,r,g,b,label\n0,1,300,0,0,\n";
        assert!(matches!(
            from_csv_str("x", text),
            Err(GplotError::Colormap { .. })
        ));
        assert!(from_csv_str("x", "unit=y\n").is_err());
    }

    #[test]
    fn test_from_path_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snow_depth.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SNOW.as_bytes()).unwrap();

        let cmap = from_csv_path(&path).unwrap();
        assert_eq!(cmap.name(), "snow_depth");
    }
}
