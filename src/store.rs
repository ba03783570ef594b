// src/store.rs
//! Append-only CSV record store.
//!
//! A store is a plain CSV file: one header row written on the first append,
//! then one row per record. Nothing is ever rewritten. Uniqueness is the
//! caller's job: query with [`RecordStore::contains`] before appending.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tracing::debug;

use crate::csv::{self, SEP};
use crate::errors::{Error, Result};
use crate::file::ensure_parent;

/// Ordered field → value mapping. Field order becomes the header order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// Value of a field the caller cannot do without.
    pub fn require(&self, field: &str, store: &Path) -> Result<&str> {
        self.get(field).ok_or_else(|| Error::Format {
            path: store.to_path_buf(),
            details: format!("missing column '{field}'"),
        })
    }
}

/// Handle to one store file. Cheap to clone; holds no open file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn exists(&self) -> bool { self.path.is_file() }

    /// Append one row. Writes the header first when the file is missing or empty;
    /// otherwise the record's fields must match that header, in order.
    /// Does not look for duplicates.
    pub fn append(&self, record: &Record) -> Result<()> {
        if record.is_empty() {
            return Err(Error::Configuration(format!(
                "refusing to append an empty record to {}",
                self.path.display()
            )));
        }
        ensure_parent(&self.path)?;

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let empty = file.metadata()?.len() == 0;
        if !empty {
            self.check_header(record)?;
        }
        let mut out = BufWriter::new(file);

        if empty {
            let header: Vec<&str> = record.field_names().collect();
            csv::write_row(&mut out, &header, SEP)?;
        }
        let values: Vec<&str> = record.values().collect();
        csv::write_row(&mut out, &values, SEP)?;
        out.flush()?;

        debug!(store = %self.path.display(), "appended {}", values.join(","));
        Ok(())
    }

    /// True iff one single row matches every field of `probe`.
    /// A missing store is simply empty.
    pub fn contains(&self, probe: &Record) -> Result<bool> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let (header, rows) = self.parse(&text)?;

        // Column index per probe field; a field the store lacks can never match.
        let mut wanted = Vec::with_capacity(probe.len());
        for (field, value) in probe.iter() {
            match header.iter().position(|h| h == field) {
                Some(ix) => wanted.push((ix, value)),
                None => return Ok(false),
            }
        }

        Ok(rows
            .iter()
            .any(|row| wanted.iter().all(|&(ix, value)| row[ix] == value)))
    }

    /// Every record, in file order.
    pub fn read_all(&self) -> Result<Vec<Record>> {
        let text = fs::read_to_string(&self.path)?;
        let (header, rows) = self.parse(&text)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut r = Record::new();
                for (field, value) in header.iter().zip(row) {
                    r.set(field.as_str(), value);
                }
                r
            })
            .collect())
    }

    /// The first row of a non-empty store must name the record's fields.
    fn check_header(&self, record: &Record) -> Result<()> {
        let mut first = s!();
        let mut reader = BufReader::new(File::open(&self.path)?);
        while first.trim().is_empty() {
            first.clear();
            if reader.read_line(&mut first)? == 0 {
                return Ok(());
            }
        }
        let header = csv::parse_rows(&first, SEP)
            .map_err(|details| self.malformed(details))?
            .into_iter()
            .next()
            .unwrap_or_default();

        if !header.iter().map(String::as_str).eq(record.field_names()) {
            return Err(self.malformed(format!(
                "record fields [{}] do not match header [{}]",
                record.field_names().collect::<Vec<_>>().join(","),
                header.join(",")
            )));
        }
        Ok(())
    }

    /// Split into header + rows, checking every row has the header's width.
    fn parse(&self, text: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut rows = csv::parse_rows(text, SEP).map_err(|details| self.malformed(details))?;
        if rows.is_empty() {
            return Ok((Vec::new(), rows));
        }
        let header = rows.remove(0);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(self.malformed(format!(
                    "row {} has {} fields, header has {}",
                    i + 1,
                    row.len(),
                    header.len()
                )));
            }
        }
        Ok((header, rows))
    }

    fn malformed(&self, details: String) -> Error {
        Error::Format { path: self.path.clone(), details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_insertion_order() {
        let r = record! { "b" => "2", "a" => "1" };
        assert_eq!(r.field_names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(r.get("a"), Some("1"));
        assert_eq!(r.get("c"), None);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut r = record! { "app_id" => "x", "category" => "tools" };
        r.set("app_id", "y");
        assert_eq!(r.values().collect::<Vec<_>>(), vec!["y", "tools"]);
    }
}
