//! Mock source for testing
//!
//! Returns a fixed set of rows, or fails every fetch.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::RawExpense;

use super::RecordSource;

#[derive(Debug, Clone, Default)]
pub struct MockSource {
    rows: Vec<RawExpense>,
    /// When set, `fetch` fails with this message
    failure: Option<String>,
}

impl MockSource {
    pub fn new(rows: Vec<RawExpense>) -> Self {
        Self {
            rows,
            failure: None,
        }
    }

    /// A source whose every fetch fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl RecordSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Result<Vec<RawExpense>> {
        match &self.failure {
            Some(message) => Err(Error::Source(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }
}
