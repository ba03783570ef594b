// src/log.rs
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::file::ensure_parent;
use crate::progress::Progress;

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Append-only scrape log, one line per event:
/// `[hh:mm:ss.mmm][LEVEL] <app_id>, <message>`.
///
/// Write failures are swallowed; a broken log must never abort a scrape.
pub struct FileLog {
    path: PathBuf,
    file: File,
    start: Instant,
}

impl FileLog {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        ensure_parent(&path).map_err(|e| io::Error::other(e.to_string()))?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file, start: Instant::now() })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn write(&mut self, level: &str, msg: &str) {
        let elapsed = fmt_elapsed(self.start.elapsed().as_millis());
        let line = format!("[{elapsed}][{level}] {msg}\n");
        let _ = self.file.write_all(line.as_bytes());
    }
}

impl Progress for FileLog {
    fn begin(&mut self, total: usize) {
        self.write("INFO", &format!("scraping {total} app(s)"));
    }

    fn item_failed(&mut self, app_id: &str, error: &str) {
        self.write("WARN", &format!("{app_id}, {error}"));
    }

    fn finish(&mut self) {
        let _ = self.file.flush();
    }
}
