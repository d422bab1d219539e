//! Persistence collaborator for accumulated model parameters.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use crate::types::{AttemptId, CatModelParams};

/// Stores [`CatModelParams`] per attempt.
///
/// Implementations must serialize updates to a single attempt; the algorithm
/// assumes at most one evaluation per attempt is in flight.
pub trait CatModelParamsStore: Send + Sync {
    fn load(&self, attempt: AttemptId) -> Result<Option<CatModelParams>>;

    fn save(&self, attempt: AttemptId, params: CatModelParams) -> Result<()>;
}

/// Mutex-guarded map, used by the simulator and tests.
#[derive(Debug, Default)]
pub struct InMemoryParamsStore {
    params: Mutex<HashMap<AttemptId, CatModelParams>>,
}

impl InMemoryParamsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatModelParamsStore for InMemoryParamsStore {
    fn load(&self, attempt: AttemptId) -> Result<Option<CatModelParams>> {
        let params = self
            .params
            .lock()
            .map_err(|_| anyhow::anyhow!("params store lock poisoned"))?;
        Ok(params.get(&attempt).copied())
    }

    fn save(&self, attempt: AttemptId, params: CatModelParams) -> Result<()> {
        self.params
            .lock()
            .map_err(|_| anyhow::anyhow!("params store lock poisoned"))?
            .insert(attempt, params);
        Ok(())
    }
}
