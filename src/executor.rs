//! Transactional query execution
//!
//! Every logical query runs inside exactly one transaction, and the
//! transaction is closed on every exit path. Rows are fully materialized
//! before the transaction ends so no store cursor outlives it.

use std::sync::Arc;

use crate::error::Result;
use crate::query::SelectQuery;
use crate::rdf::Binding;
use crate::store::{GraphStore, TransactionMode};

/// Runs queries against the store with a single begin/end pair per call
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn GraphStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Execute a SELECT inside one transaction and materialize all rows
    ///
    /// A `None` result set from the store is zero rows, not an error. If
    /// execution fails the transaction is still closed before the error
    /// propagates; a failure of the close itself is logged and the original
    /// error wins.
    pub async fn select(&self, query: &SelectQuery, mode: TransactionMode) -> Result<Vec<Binding>> {
        tracing::debug!(query = query.text(), "executing graph query");
        self.store.begin(mode).await?;

        let outcome = self.store.select(query).await;
        match outcome {
            Ok(rows) => {
                self.store.end().await?;
                let rows = rows.unwrap_or_default();
                tracing::debug!(rows = rows.len(), "graph query returned");
                Ok(rows)
            }
            Err(err) => {
                if let Err(end_err) = self.store.end().await {
                    tracing::warn!("failed to close transaction after query error: {end_err}");
                }
                Err(err)
            }
        }
    }
}
