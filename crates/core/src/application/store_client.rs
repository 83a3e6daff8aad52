// Transactional Store Client
//
// Every operation runs in its own session: begin -> work -> commit, with a
// rollback on any failure after begin. Pool exhaustion on `query` is
// retried with a constant backoff; writes retry only when the policy says so.

use super::interrupt::InterruptToken;
use super::retry::{RetryDecision, RetryPolicy};
use crate::domain::Stock;
use crate::error::{AppError, Result};
use crate::port::{StockCommand, StockQuery, StockSession, StockStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct StoreClient {
    store: Arc<dyn StockStore>,
    retry_policy: RetryPolicy,
    interrupt: Option<InterruptToken>,
}

impl StoreClient {
    pub fn new(store: Arc<dyn StockStore>, retry_policy: RetryPolicy) -> Self {
        Self {
            store,
            retry_policy,
            interrupt: None,
        }
    }

    /// Allow backoff waits to be cut short by `token`
    pub fn with_interrupt(mut self, token: InterruptToken) -> Self {
        self.interrupt = Some(token);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Run a read statement in its own transaction
    ///
    /// Retries from scratch, in a fresh session, while the pool is exhausted.
    pub async fn query(&self, query: &StockQuery) -> Result<Vec<Stock>> {
        self.with_retry("query", true, move || self.query_once(query))
            .await
    }

    /// Run a write statement in its own transaction
    pub async fn execute(&self, command: &StockCommand) -> Result<u64> {
        let retryable = self.retry_policy.retries_writes();
        self.with_retry("execute", retryable, move || self.execute_once(command))
            .await
    }

    /// Insert or replace a stock in its own transaction
    pub async fn save(&self, stock: &Stock) -> Result<()> {
        let retryable = self.retry_policy.retries_writes();
        self.with_retry("save", retryable, move || self.save_once(stock))
            .await
    }

    /// Load a stock by symbol and delete it, in one transaction
    ///
    /// Fails with `AppError::NotFound` if no such stock exists.
    pub async fn delete(&self, symbol: &str) -> Result<()> {
        let retryable = self.retry_policy.retries_writes();
        self.with_retry("delete", retryable, move || self.delete_once(symbol))
            .await
    }

    async fn query_once(&self, query: &StockQuery) -> Result<Vec<Stock>> {
        let mut session = self.store.begin().await?;
        let outcome = session.query(query).await;
        finish(session, outcome).await
    }

    async fn execute_once(&self, command: &StockCommand) -> Result<u64> {
        let mut session = self.store.begin().await?;
        let outcome = session.execute(command).await;
        finish(session, outcome).await
    }

    async fn save_once(&self, stock: &Stock) -> Result<()> {
        let mut session = self.store.begin().await?;
        let outcome = session.save(stock).await;
        finish(session, outcome).await
    }

    async fn delete_once(&self, symbol: &str) -> Result<()> {
        let mut session = self.store.begin().await?;
        let outcome = match session.load(symbol).await {
            Ok(Some(stock)) => session.delete(&stock).await,
            Ok(None) => Err(AppError::NotFound(format!("Stock {}", symbol))),
            Err(e) => Err(e),
        };
        finish(session, outcome).await
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        retryable: bool,
        mut attempt_once: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);

            let err = match attempt_once().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "Store operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if !retryable => return Err(e),
                Err(e) => e,
            };

            match self.retry_policy.should_retry(&err, attempt) {
                RetryDecision::Retry(backoff) => {
                    warn!(
                        operation,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "No connection available in the connection pool, backing off"
                    );
                    self.wait(backoff).await?;
                }
                RetryDecision::GiveUp => return Err(err),
            }
        }
    }

    async fn wait(&self, backoff: Duration) -> Result<()> {
        let Some(token) = &self.interrupt else {
            tokio::time::sleep(backoff).await;
            return Ok(());
        };

        let mut token = token.clone();
        if token.is_interrupted() {
            return Err(AppError::Interrupted(
                "interrupted before pool retry backoff".to_string(),
            ));
        }

        tokio::select! {
            _ = tokio::time::sleep(backoff) => Ok(()),
            _ = token.wait() => Err(AppError::Interrupted(format!(
                "interrupted during {}ms pool retry backoff",
                backoff.as_millis()
            ))),
        }
    }
}

/// Commit on success, otherwise roll back and return the original error
async fn finish<T>(session: Box<dyn StockSession>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback().await {
                warn!(error = %rollback_err, "Rollback failed after store error");
            }
            Err(err)
        }
    }
}
