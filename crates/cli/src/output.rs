// ABOUTME: Results directory writer and per-run failure accounting for the CLI.
// ABOUTME: Successful records go to pretty JSON files; failed targets are logged and counted.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use simweb_fetch::Outcome;
use tracing::{error, info, warn};

/// Directory that receives one JSON document per scrape category.
#[derive(Debug, Clone)]
pub struct ResultsDir {
    dir: PathBuf,
}

impl ResultsDir {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Writes `value` as pretty JSON to `name`, creating the directory if needed.
    pub fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating results directory {}", self.dir.display()))?;
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json + "\n").with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Writes a batch of records unless it is empty.
    ///
    /// An empty batch also removes `name` if an earlier run left it behind,
    /// so the directory never shows results this run did not produce.
    pub fn write_records<T: Serialize>(&self, name: &str, records: &[T]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            self.discard(name)?;
            return Ok(None);
        }
        let path = self.write(name, records)?;
        info!(path = %path.display(), records = records.len(), "results written");
        Ok(Some(path))
    }

    /// Writes records grouped under their keys, with the same empty-batch
    /// handling as [`ResultsDir::write_records`].
    pub fn write_groups<T: Serialize>(
        &self,
        name: &str,
        groups: &BTreeMap<String, Vec<T>>,
    ) -> Result<Option<PathBuf>> {
        if groups.is_empty() {
            self.discard(name)?;
            return Ok(None);
        }
        let path = self.write(name, groups)?;
        let records: usize = groups.values().map(Vec::len).sum();
        info!(path = %path.display(), groups = groups.len(), records, "results written");
        Ok(Some(path))
    }

    fn discard(&self, name: &str) -> Result<()> {
        let path = self.dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => warn!(path = %path.display(), "nothing scraped, removed stale results"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(file = name, "nothing scraped, not writing")
            }
            Err(e) => return Err(e).with_context(|| format!("removing {}", path.display())),
        }
        Ok(())
    }
}

/// Counts failed targets across a run.
#[derive(Debug, Default)]
pub struct Report {
    failed: usize,
}

impl Report {
    /// Logs and counts one failed target.
    pub fn failure(&mut self, kind: &str, target: &str, err: &dyn std::fmt::Display) {
        error!(kind, target_name = target, error = %err, "scrape failed");
        self.failed += 1;
    }

    /// Splits a batch into its successful values, logging the failures.
    pub fn successes<T>(&mut self, kind: &str, outcomes: Vec<Outcome<T>>) -> Vec<T> {
        self.successes_by_target(kind, outcomes)
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    /// Like [`Report::successes`], keeping each value's target.
    pub fn successes_by_target<T>(&mut self, kind: &str, outcomes: Vec<Outcome<T>>) -> Vec<(String, T)> {
        let mut ok = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome.result {
                Ok(value) => ok.push((outcome.target, value)),
                Err(err) => self.failure(kind, &outcome.target, &err),
            }
        }
        ok
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}
