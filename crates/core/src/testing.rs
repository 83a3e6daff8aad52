// In-memory StockStore with fault injection (unit tests only)

use crate::domain::Stock;
use crate::error::{AppError, Result};
use crate::port::{StockCommand, StockQuery, StockSession, StockStore, Transaction};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    rows: Vec<Stock>,
    begin_failures: VecDeque<AppError>,
    op_failures: VecDeque<AppError>,
    begin_calls: usize,
    opened: usize,
    committed: usize,
    rolled_back: usize,
}

/// Store whose rows live in a Vec, so duplicate symbols can be seeded
#[derive(Clone, Default)]
pub(crate) struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Insert a row directly, bypassing uniqueness
    pub(crate) fn seed(&self, stock: Stock) {
        self.lock().rows.push(stock);
    }

    pub(crate) fn rows(&self) -> Vec<Stock> {
        self.lock().rows.clone()
    }

    /// Make the next `begin` fail
    pub(crate) fn fail_next_begin(&self, err: AppError) {
        self.lock().begin_failures.push_back(err);
    }

    /// Make the next session operation fail
    pub(crate) fn fail_next_operation(&self, err: AppError) {
        self.lock().op_failures.push_back(err);
    }

    pub(crate) fn begin_calls(&self) -> usize {
        self.lock().begin_calls
    }

    pub(crate) fn committed(&self) -> usize {
        self.lock().committed
    }

    pub(crate) fn rolled_back(&self) -> usize {
        self.lock().rolled_back
    }

    /// Sessions begun but neither committed nor rolled back
    pub(crate) fn open_sessions(&self) -> usize {
        let state = self.lock();
        state.opened - state.committed - state.rolled_back
    }
}

pub(crate) fn pool_exhausted() -> AppError {
    AppError::PoolExhausted("pool timed out while waiting for an open connection".into())
}

#[async_trait]
impl StockStore for FakeStore {
    async fn begin(&self) -> Result<Box<dyn StockSession>> {
        let mut state = self.lock();
        state.begin_calls += 1;
        if let Some(err) = state.begin_failures.pop_front() {
            return Err(err);
        }
        state.opened += 1;
        let rows = state.rows.clone();
        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
            rows,
        }))
    }
}

/// Works on a private copy of the rows, published on commit
struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    rows: Vec<Stock>,
}

impl FakeSession {
    fn injected_failure(&self) -> Result<()> {
        match self.state.lock().unwrap().op_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transaction for FakeSession {
    async fn commit(self: Box<Self>) -> Result<()> {
        let FakeSession { state, rows } = *self;
        let mut state = state.lock().unwrap();
        state.rows = rows;
        state.committed += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.state.lock().unwrap().rolled_back += 1;
        Ok(())
    }
}

#[async_trait]
impl StockSession for FakeSession {
    async fn query(&mut self, query: &StockQuery) -> Result<Vec<Stock>> {
        self.injected_failure()?;
        Ok(match query {
            StockQuery::All => self.rows.clone(),
            StockQuery::BySymbol(symbol) => self
                .rows
                .iter()
                .filter(|s| &s.symbol == symbol)
                .cloned()
                .collect(),
        })
    }

    async fn execute(&mut self, command: &StockCommand) -> Result<u64> {
        self.injected_failure()?;
        match command {
            StockCommand::DeleteBySymbols(symbols) => {
                if symbols.is_empty() {
                    return Err(AppError::Validation("empty symbol list".into()));
                }
                let before = self.rows.len();
                self.rows.retain(|s| !symbols.contains(&s.symbol));
                Ok((before - self.rows.len()) as u64)
            }
        }
    }

    async fn save(&mut self, stock: &Stock) -> Result<()> {
        self.injected_failure()?;
        match self.rows.iter_mut().find(|s| s.symbol == stock.symbol) {
            Some(existing) => *existing = stock.clone(),
            None => self.rows.push(stock.clone()),
        }
        Ok(())
    }

    async fn load(&mut self, symbol: &str) -> Result<Option<Stock>> {
        self.injected_failure()?;
        Ok(self.rows.iter().find(|s| s.symbol == symbol).cloned())
    }

    async fn delete(&mut self, stock: &Stock) -> Result<()> {
        self.injected_failure()?;
        self.rows.retain(|s| s.symbol != stock.symbol);
        Ok(())
    }
}
