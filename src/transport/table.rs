//! CSV label tables with free-text cells.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use indexmap::IndexMap;
use serde_json::Value;

use crate::constants::table::NA_MARKERS;
use crate::errors::PotemkinError;
use crate::transport::fs::path_string;
use crate::types::{ColumnName, ExtraFields, PathString, SourceId};

/// True when a cell counts as missing (empty, whitespace, or an NA marker).
pub fn is_missing_cell(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NA_MARKERS.contains(&trimmed)
}

/// An open label table whose header has been validated.
pub struct LabelTable {
    path: PathBuf,
    headers: Vec<ColumnName>,
    records: StringRecordsIntoIter<File>,
}

impl LabelTable {
    /// Open `path` and check that every `required` column is present.
    ///
    /// Rows are not read until [`LabelTable::rows`] is iterated.
    pub fn open(
        source_id: &str,
        path: &Path,
        required: &[&str],
    ) -> Result<Self, PotemkinError> {
        if !path.is_file() {
            return Err(PotemkinError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: format!("label table '{}' not found", path.display()),
            });
        }
        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<ColumnName> = reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();
        for column in required {
            if !headers.iter().any(|header| header.as_str() == *column) {
                return Err(PotemkinError::MissingColumn {
                    source_id: SourceId::from(source_id),
                    column: column.to_string(),
                });
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            records: reader.into_records(),
        })
    }

    /// Trimmed header names in file order.
    pub fn headers(&self) -> &[ColumnName] {
        &self.headers
    }

    /// Lazily parsed rows. CSV syntax errors surface as `PotemkinError::Table`.
    pub fn rows(self) -> impl Iterator<Item = Result<LabelRow, PotemkinError>> {
        let LabelTable {
            path,
            headers,
            records,
        } = self;
        let table = path_string(&path);
        records.map(move |record| -> Result<LabelRow, PotemkinError> {
            let record = record?;
            Ok(LabelRow::from_record(&table, &headers, &record))
        })
    }
}

/// One label-table row keyed by header.
#[derive(Clone, Debug)]
pub struct LabelRow {
    table: PathString,
    line: u64,
    cells: IndexMap<ColumnName, String>,
}

impl LabelRow {
    fn from_record(table: &str, headers: &[ColumnName], record: &StringRecord) -> Self {
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        Self {
            table: table.to_string(),
            line: record.position().map(|pos| pos.line()).unwrap_or(0),
            cells,
        }
    }

    /// Build a row directly from `(column, cell)` pairs.
    pub fn from_cells<I, K, V>(table: &str, line: u64, cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ColumnName>,
        V: Into<String>,
    {
        Self {
            table: table.to_string(),
            line,
            cells: cells
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Trimmed cell value, or `None` when the cell is absent or missing.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|cell| !is_missing_cell(cell))
            .map(str::trim)
    }

    /// `table:line` location used in errors and logs.
    pub fn location(&self) -> PathString {
        format!("{}:{}", self.table, self.line)
    }

    /// Cells outside `exclude` as JSON strings; missing cells become `null`.
    pub fn extra_fields(&self, exclude: &[&str]) -> ExtraFields {
        self.cells
            .iter()
            .filter(|(column, _)| !exclude.contains(&column.as_str()))
            .map(|(column, cell)| {
                let value = if is_missing_cell(cell) {
                    Value::Null
                } else {
                    Value::String(cell.clone())
                };
                (column.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_quoted_multiline_cells() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("labels.csv");
        std::fs::write(
            &path,
            "Concept,Model,Inference,Correct\nHaiku,gpt-4o,\"Line one,\nline two\",1.0\n",
        )
        .unwrap();

        let table = LabelTable::open("classify", &path, &["Concept", "Correct"]).unwrap();
        assert_eq!(table.headers().len(), 4);
        let rows: Vec<LabelRow> = table.rows().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("Inference"), Some("Line one,\nline two"));
        assert_eq!(rows[0].value("Correct"), Some("1.0"));
        assert!(rows[0].location().ends_with("labels.csv:2"));
    }

    #[test]
    fn missing_table_and_missing_column() {
        let temp = tempdir().unwrap();
        let err = LabelTable::open("define", &temp.path().join("absent.csv"), &[])
            .err()
            .unwrap();
        assert!(matches!(err, PotemkinError::SourceUnavailable { .. }));

        let path = temp.path().join("labels.csv");
        std::fs::write(&path, "Concept,File\nHaiku,0.txt\n").unwrap();
        let err = LabelTable::open("define", &path, &["Concept", "Model"])
            .err()
            .unwrap();
        match err {
            PotemkinError::MissingColumn { column, .. } => assert_eq!(column, "Model"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn na_markers_and_short_rows_are_missing() {
        let row = LabelRow::from_cells(
            "t.csv",
            3,
            [("Concept", " Haiku "), ("Model", "NaN"), ("File", "  ")],
        );
        assert_eq!(row.value("Concept"), Some("Haiku"));
        assert_eq!(row.value("Model"), None);
        assert_eq!(row.value("File"), None);
        assert_eq!(row.value("Correct"), None);
    }

    #[test]
    fn extra_fields_keep_raw_cells() {
        let row = LabelRow::from_cells(
            "t.csv",
            2,
            [("Concept", "Haiku"), ("Notes", " kept as-is "), ("Rater", "")],
        );
        let extra = row.extra_fields(&["Concept"]);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["Notes"], Value::String(" kept as-is ".into()));
        assert_eq!(extra["Rater"], Value::Null);
    }
}
