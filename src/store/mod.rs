//! SQLite access for labeled messages and evaluation reports.

use std::path::Path;

use ndarray::Array2;
use rusqlite::{params, Connection};
use tracing::info;

use crate::config::DataConfig;
use crate::error::{AppError, Result};
use crate::ml::dataset::LabeledDataset;
use crate::ml::metrics::ClassificationReport;

/// Connection to one SQLite database file.
pub struct MessageStore {
    conn: Connection,
}

impl MessageStore {
    /// Open an existing database; the file must already be there.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "database file {}",
                path.display()
            )));
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open a database for writing, creating the file and any missing
    /// parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Load the labeled dataset described by `config`.
    ///
    /// The text column is found by name. Every column from `label_offset`
    /// onward, in table order, is a category; any non-zero, non-NULL value
    /// counts as positive.
    pub fn load_dataset(&self, config: &DataConfig) -> Result<LabeledDataset> {
        let table = &config.messages_table;
        check_identifier(table)?;
        if !self.table_exists(table)? {
            return Err(AppError::NotFound(format!("table '{table}'")));
        }

        let mut stmt = self.conn.prepare(&format!("SELECT * FROM {table}"))?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|c| c.to_string()).collect();

        let text_index = column_names
            .iter()
            .position(|name| name == &config.text_column)
            .ok_or_else(|| {
                AppError::DataFormat(format!(
                    "table '{}' has no '{}' column",
                    table, config.text_column
                ))
            })?;

        if config.label_offset >= column_names.len() {
            return Err(AppError::DataFormat(format!(
                "label offset {} leaves no category columns in table '{}' ({} columns)",
                config.label_offset,
                table,
                column_names.len()
            )));
        }
        if text_index >= config.label_offset {
            return Err(AppError::DataFormat(format!(
                "text column '{}' at index {} falls inside the category range starting at {}",
                config.text_column, text_index, config.label_offset
            )));
        }
        let category_names: Vec<String> = column_names[config.label_offset..].to_vec();

        let mut texts: Vec<String> = Vec::new();
        let mut flat: Vec<u8> = Vec::new();
        let mut rows = stmt.query([])?;
        let mut row_number = 0usize;
        while let Some(row) = rows.next()? {
            row_number += 1;
            let text = row
                .get::<_, Option<String>>(text_index)?
                .ok_or_else(|| {
                    AppError::DataFormat(format!("row {row_number}: NULL message text"))
                })?;
            texts.push(text);
            for column in config.label_offset..column_names.len() {
                let value: Option<i64> = row.get(column)?;
                flat.push(u8::from(value.unwrap_or(0) != 0));
            }
        }

        if texts.is_empty() {
            return Err(AppError::DataFormat(format!(
                "table '{table}' contains no rows"
            )));
        }

        let labels = Array2::from_shape_vec((texts.len(), category_names.len()), flat)
            .map_err(|e| AppError::DataFormat(format!("label matrix shape: {e}")))?;
        info!(
            rows = texts.len(),
            categories = category_names.len(),
            table = %table,
            "loaded labeled messages"
        );
        LabeledDataset::new(texts, labels, category_names)
    }

    /// Replace `table` with the report's rows, one per category in column
    /// order. Drop, create and insert run inside a single transaction.
    pub fn write_report(&mut self, table: &str, report: &ClassificationReport) -> Result<()> {
        check_identifier(table)?;

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 category TEXT NOT NULL,
                 precision REAL NOT NULL,
                 recall REAL NOT NULL,
                 f1_score REAL NOT NULL,
                 support INTEGER NOT NULL
             );"
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} (category, precision, recall, f1_score, support)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ))?;
            for metrics in &report.per_category {
                stmt.execute(params![
                    metrics.category,
                    metrics.precision,
                    metrics.recall,
                    metrics.f1_score,
                    metrics.support as i64,
                ])?;
            }
        }
        tx.commit()?;
        info!(table = %table, categories = report.per_category.len(), "wrote evaluation report");
        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
fn check_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "'{name}' is not a valid table name"
        )))
    }
}
