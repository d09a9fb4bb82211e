// json_loader.rs
// Generic string tables: every row maps a column name to a string value, "None" marks absence.
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{HandshapeError, Result};
use crate::joint::parse_degrees;

pub type Row = BTreeMap<String, String>;
pub type Table = Vec<Row>;

/// Absent-value marker used in table cells.
pub const NONE_SENTINEL: &str = "None";

pub const TABLE_FILES: &[&str] = &[
    "flexion.json",
    "abduction.json",
    "thumb_cm.json",
    "orientation.json",
    "fingerCodingKey.json",
    "jointCodingKey.json",
    "abdCodingKey.json",
    "letters.json",
    "defaults.json",
];

// include_str! requires compile-time paths; all tables must be listed here.
fn asset(name: &str) -> Result<&'static str> {
    match name {
        "flexion.json"         => Ok(include_str!("../assets/tables/flexion.json")),
        "abduction.json"       => Ok(include_str!("../assets/tables/abduction.json")),
        "thumb_cm.json"        => Ok(include_str!("../assets/tables/thumb_cm.json")),
        "orientation.json"     => Ok(include_str!("../assets/tables/orientation.json")),
        "fingerCodingKey.json" => Ok(include_str!("../assets/tables/fingerCodingKey.json")),
        "jointCodingKey.json"  => Ok(include_str!("../assets/tables/jointCodingKey.json")),
        "abdCodingKey.json"    => Ok(include_str!("../assets/tables/abdCodingKey.json")),
        "letters.json"         => Ok(include_str!("../assets/tables/letters.json")),
        "defaults.json"        => Ok(include_str!("../assets/tables/defaults.json")),
        _ => Err(HandshapeError::Asset(name.to_string())),
    }
}

/// Where table files come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableSource {
    #[default]
    Embedded,
    Dir(std::path::PathBuf),
}

impl TableSource {
    pub fn read(&self, name: &str) -> Result<String> {
        match self {
            Self::Embedded => asset(name).map(str::to_string),
            Self::Dir(dir) => {
                let path = dir.join(name);
                std::fs::read_to_string(&path).map_err(|e| HandshapeError::io(path, e))
            }
        }
    }

    pub fn load<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Result<T> {
        let raw = self.read(name)?;
        serde_json::from_str(&raw).map_err(|source| HandshapeError::Table { name: name.to_string(), source })
    }

    pub fn load_table(&self, name: &str) -> Result<Table> {
        match self {
            Self::Embedded => self.load(name),
            Self::Dir(dir) => load_table_file(&dir.join(name)),
        }
    }
}

/// Loads an embedded table by file name.
pub fn load_table(name: &str) -> Result<Table> {
    TableSource::Embedded.load_table(name)
}

/// Loads a table from an arbitrary file.
pub fn load_table_file(path: &Path) -> Result<Table> {
    let raw = std::fs::read_to_string(path).map_err(|e| HandshapeError::io(path, e))?;
    serde_json::from_str(&raw)
        .map_err(|source| HandshapeError::Table { name: path.display().to_string(), source })
}

/// Column name → values in row order. Columns come from the first row.
pub fn to_columns(table: &[Row]) -> BTreeMap<String, Vec<String>> {
    let Some(first) = table.first() else { return BTreeMap::new() };
    first.keys()
        .map(|col| {
            let values = table.iter().map(|row| row.get(col).cloned().unwrap_or_default()).collect();
            (col.clone(), values)
        })
        .collect()
}

/// Key value → the rest of the row. Later rows win on duplicate keys.
pub fn index_by(table: &[Row], key_column: &str) -> Result<HashMap<String, Row>> {
    table.iter()
        .map(|row| {
            let key = text(row, key_column)?.to_string();
            let rest = row.iter()
                .filter(|(col, _)| col.as_str() != key_column)
                .map(|(col, v)| (col.clone(), v.clone()))
                .collect();
            Ok((key, rest))
        })
        .collect()
}

// ── Typed access ──────────────────────────────────────────────────────────────

/// Typed view of one table row, built once at load time.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

pub fn rows<T: FromRow>(table: &[Row]) -> Result<Vec<T>> {
    table.iter().map(T::from_row).collect()
}

pub fn text<'a>(row: &'a Row, column: &str) -> Result<&'a str> {
    row.get(column)
        .map(String::as_str)
        .ok_or_else(|| HandshapeError::Validation(format!("missing column '{column}'")))
}

/// A cell that may hold the "None" sentinel.
pub fn optional<'a>(row: &'a Row, column: &str) -> Result<Option<&'a str>> {
    let value = text(row, column)?;
    Ok(if value == NONE_SENTINEL || value.is_empty() { None } else { Some(value) })
}

pub fn degrees(row: &Row, column: &str) -> Result<i32> {
    parse_degrees(text(row, column)?)
}

pub fn optional_degrees(row: &Row, column: &str) -> Result<Option<i32>> {
    optional(row, column)?.map(parse_degrees).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn columns_follow_row_order() {
        let table = vec![row(&[("psf", "#"), ("MCP", "flex")]), row(&[("psf", "c"), ("MCP", "mid")])];
        let cols = to_columns(&table);
        assert_eq!(cols["psf"], vec!["#", "c"]);
        assert_eq!(cols["MCP"], vec!["flex", "mid"]);
        assert!(to_columns(&[]).is_empty());
    }

    #[test]
    fn index_by_drops_the_key_column() {
        let table = vec![row(&[("letter", "a"), ("pm", "T-;#")])];
        let idx = index_by(&table, "letter").unwrap();
        assert_eq!(idx["a"]["pm"], "T-;#");
        assert!(!idx["a"].contains_key("letter"));
        assert!(matches!(index_by(&table, "nope"), Err(HandshapeError::Validation(_))));
    }

    #[test]
    fn sentinel_and_degree_cells() {
        let r = row(&[("flexion", "None"), ("spread", "30"), ("bad", "3.5")]);
        assert_eq!(optional(&r, "flexion").unwrap(), None);
        assert_eq!(optional_degrees(&r, "spread").unwrap(), Some(30));
        assert!(degrees(&r, "bad").is_err());
        assert!(text(&r, "missing").is_err());
    }

    #[test]
    fn every_embedded_table_parses() {
        for name in TABLE_FILES.iter().filter(|n| **n != "defaults.json") {
            let table = load_table(name).unwrap();
            assert!(!table.is_empty(), "{name} is empty");
        }
        assert!(matches!(load_table("skeleton.json"), Err(HandshapeError::Asset(_))));
    }

    #[test]
    fn directory_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t.json"), r#"[{"a":"1"}]"#).unwrap();
        let table = TableSource::Dir(dir.path().to_path_buf()).load_table("t.json").unwrap();
        assert_eq!(table[0]["a"], "1");
        assert_eq!(load_table_file(&dir.path().join("t.json")).unwrap(), table);
        let missing = TableSource::Dir(dir.path().to_path_buf()).load_table("x.json").unwrap_err();
        assert!(matches!(missing, HandshapeError::Io { path, .. } if path.ends_with("x.json")));
    }
}
