//! On-disk JSON cache of the last successful load

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{ExpenseRecord, People, RawExpense};

/// File layout of the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedExpenses {
    pub person_a: String,
    pub person_b: String,
    pub shared: String,
    pub expenses: Vec<RawExpense>,
}

impl CachedExpenses {
    pub fn from_records(records: &[ExpenseRecord], people: &People) -> Self {
        Self {
            person_a: people.person_a.clone(),
            person_b: people.person_b.clone(),
            shared: People::SHARED_LABEL.to_string(),
            expenses: records.iter().map(|r| r.to_raw(people)).collect(),
        }
    }

    /// Names the rows were written with
    pub fn people(&self) -> People {
        People::new(&self.person_a, &self.person_b)
    }
}

#[derive(Debug, Clone)]
pub struct JsonCache {
    path: PathBuf,
}

impl JsonCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the cache. Missing file is `Error::NotFound`.
    pub fn load(&self) -> Result<CachedExpenses> {
        if !self.path.exists() {
            return Err(Error::NotFound(format!(
                "No cache at {}",
                self.path.display()
            )));
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let cached: CachedExpenses = serde_json::from_str(&contents)?;
        Ok(cached)
    }

    /// Replace the cache with `records`
    pub fn save(&self, records: &[ExpenseRecord], people: &People) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let cached = CachedExpenses::from_records(records, people);
        let json = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&self.path, json)?;
        info!(
            path = %self.path.display(),
            records = records.len(),
            "Saved expense cache"
        );
        Ok(())
    }
}
