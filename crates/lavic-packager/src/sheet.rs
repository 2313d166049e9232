// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input spreadsheet reading.
//!
//! `.xlsx`/`.xls`/`.ods` workbooks are read with calamine (first worksheet,
//! first row is the header); `.csv` files with the csv crate.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use lavic_config::model::PackagerConfig;
use lavic_core::LavicError;
use tracing::debug;

/// One row of the input sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    pub display_name: String,
    pub dynamics_text: String,
    pub category: String,
}

/// Header names of the three columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetColumns {
    pub name: String,
    pub dynamics: String,
    pub category: String,
}

impl Default for SheetColumns {
    fn default() -> Self {
        Self {
            name: "文本".into(),
            dynamics: "基本属性".into(),
            category: "类型".into(),
        }
    }
}

impl From<&PackagerConfig> for SheetColumns {
    fn from(config: &PackagerConfig) -> Self {
        Self {
            name: config.name_column.clone(),
            dynamics: config.dynamics_column.clone(),
            category: config.category_column.clone(),
        }
    }
}

/// Reads every data row. Missing cells become empty strings; rows with an
/// empty name are dropped.
pub fn read_rows(path: &Path, columns: &SheetColumns) -> Result<Vec<SheetRow>, LavicError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let table = if is_csv {
        read_csv(path)?
    } else {
        read_workbook(path)?
    };
    let rows = rows_from_table(table, columns, path)?;
    debug!(path = %path.display(), rows = rows.len(), "spreadsheet read");
    Ok(rows)
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>, LavicError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LavicError::Sheet(format!("{}: {e}", path.display())))?;
    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| LavicError::Sheet(format!("{}: {e}", path.display())))
        })
        .collect()
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<String>>, LavicError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LavicError::Sheet(format!("{}: {e}", path.display())))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LavicError::Sheet(format!("{}: workbook has no sheets", path.display())))?
        .map_err(|e| LavicError::Sheet(format!("{}: {e}", path.display())))?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn rows_from_table(
    table: Vec<Vec<String>>,
    columns: &SheetColumns,
    path: &Path,
) -> Result<Vec<SheetRow>, LavicError> {
    let mut rows = table.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| LavicError::Sheet(format!("{}: sheet is empty", path.display())))?;
    let index_of = |name: &str| header.iter().position(|h| h.trim() == name);

    let name_idx = index_of(&columns.name).ok_or_else(|| {
        LavicError::Sheet(format!(
            "{}: missing column `{}`",
            path.display(),
            columns.name
        ))
    })?;
    let dynamics_idx = index_of(&columns.dynamics);
    let category_idx = index_of(&columns.category);

    let cell = |row: &[String], idx: Option<usize>| {
        idx.and_then(|i| row.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    Ok(rows
        .map(|row| SheetRow {
            display_name: cell(&row, Some(name_idx)),
            dynamics_text: cell(&row, dynamics_idx),
            category: cell(&row, category_idx),
        })
        .filter(|row| !row.display_name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_by_header_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fighters.csv");
        std::fs::write(
            &path,
            "序号,类型,文本,基本属性\n\
             1,战斗机,F-22猛禽战斗机,\"最大速度：670，最大角速度：35\"\n\
             2,战斗机,,\n\
             3,战斗机,J-20威龙战斗机\n",
        )
        .unwrap();

        let rows = read_rows(&path, &SheetColumns::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            SheetRow {
                display_name: "F-22猛禽战斗机".into(),
                dynamics_text: "最大速度：670，最大角速度：35".into(),
                category: "战斗机".into(),
            }
        );
        assert_eq!(rows[1].display_name, "J-20威龙战斗机");
        assert_eq!(rows[1].dynamics_text, "");
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        let err = read_rows(&path, &SheetColumns::default()).unwrap_err();
        assert!(err.to_string().contains("missing column `文本`"));
    }

    #[test]
    fn unreadable_workbook_is_sheet_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fighters.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        assert!(matches!(
            read_rows(&path, &SheetColumns::default()),
            Err(LavicError::Sheet(_))
        ));
    }
}
