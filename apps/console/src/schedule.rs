//! Persisted overview schedule.
//!
//! A one-time shuffle of event ids plus an advancing index. The shuffle runs
//! only when no usable state is stored, so reloading the page resumes the same
//! sequence of months instead of drawing a new one.

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
#[cfg(test)]
use std::rc::Rc;

use gloo_storage::{LocalStorage, Storage};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;

/// Scoped key-value port the cursor persists through.
pub trait ScheduleStore {
    fn load(&self, key: &str) -> Option<Value>;
    fn save(&self, key: &str, value: &Value) -> anyhow::Result<()>;
    fn clear(&self, key: &str);
}

/// Browser `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

impl ScheduleStore for BrowserStore {
    fn load(&self, key: &str) -> Option<Value> {
        LocalStorage::get::<Value>(key).ok()
    }

    fn save(&self, key: &str, value: &Value) -> anyhow::Result<()> {
        LocalStorage::set(key, value)
            .map_err(|err| anyhow::anyhow!("failed to write {key} to localStorage: {err}"))
    }

    fn clear(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// In-process store backing the cursor tests.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Value>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_entry(key: &str, value: Value) -> Self {
        let store = Self::default();
        store.entries.borrow_mut().insert(key.to_string(), value);
        store
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }
}

#[cfg(test)]
impl ScheduleStore for MemoryStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    fn save(&self, key: &str, value: &Value) -> anyhow::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn clear(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub ids: Vec<String>,
    pub idx: usize,
}

impl ScheduleState {
    /// Accepts any object whose `ids` is an array of strings and whose `idx`
    /// is a number. Bounds are not checked.
    pub fn from_persisted(value: &Value) -> Option<Self> {
        let ids = value
            .get("ids")?
            .as_array()?
            .iter()
            .map(|id| id.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()?;
        let idx = value.get("idx")?.as_f64()?;

        Some(Self {
            ids,
            // saturating: fractions truncate, negatives land on 0
            idx: idx as usize,
        })
    }

    pub fn to_persisted(&self) -> Value {
        serde_json::json!({ "ids": self.ids, "idx": self.idx })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub year: usize,
    pub month: usize,
}

impl Period {
    pub fn from_index(idx: usize, months_per_year: usize) -> Self {
        let months_per_year = months_per_year.max(1);
        Self {
            year: idx / months_per_year + 1,
            month: idx % months_per_year + 1,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}年 {}月", self.year, self.month)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorSettings {
    pub storage_key: String,
    pub capacity: usize,
    pub months_per_year: usize,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl CursorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            capacity: config.schedule_capacity(),
            months_per_year: config.events_per_year,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Resumed,
    ColdStart,
}

/// Uniform in-place permutation: walk from the last slot down to 1 and swap
/// each with a slot drawn from `[0, i]`.
pub fn shuffle_ids<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[derive(Clone, Debug)]
pub struct ScheduleCursor<S> {
    store: S,
    settings: CursorSettings,
    state: ScheduleState,
}

impl<S: ScheduleStore> ScheduleCursor<S> {
    pub fn new(store: S, settings: CursorSettings) -> Self {
        Self {
            store,
            settings,
            state: ScheduleState::default(),
        }
    }

    /// Adopts persisted state when it is structurally valid; otherwise fetches
    /// the id list, keeps the first `capacity` ids, shuffles and persists.
    pub async fn initialize<R, F, Fut, E>(
        &mut self,
        rng: &mut R,
        fetch_ids: F,
    ) -> Result<InitOutcome, E>
    where
        R: Rng + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, E>>,
    {
        if let Some(state) = self
            .store
            .load(&self.settings.storage_key)
            .as_ref()
            .and_then(ScheduleState::from_persisted)
        {
            tracing::info!(ids = state.ids.len(), idx = state.idx, "schedule resumed");
            self.state = state;
            return Ok(InitOutcome::Resumed);
        }

        let mut ids = fetch_ids().await?;
        ids.truncate(self.settings.capacity);
        shuffle_ids(&mut ids, rng);

        self.state = ScheduleState { ids, idx: 0 };
        self.persist();
        tracing::info!(ids = self.state.ids.len(), "schedule created");
        Ok(InitOutcome::ColdStart)
    }

    /// Moves one month forward, saturating at the end of the schedule.
    pub fn advance(&mut self) {
        let next = self.state.idx.saturating_add(1).min(self.state.ids.len());
        if next == self.state.idx {
            return;
        }
        self.state.idx = next;
        self.persist();
    }

    /// Drops the persisted schedule; the next `initialize` starts cold.
    pub fn reset(&mut self) {
        self.store.clear(&self.settings.storage_key);
        self.state = ScheduleState::default();
        tracing::info!("schedule reset");
    }

    pub fn current_period(&self) -> Period {
        Period::from_index(self.state.idx, self.settings.months_per_year)
    }

    pub fn current_id(&self) -> Option<&str> {
        let last = self.state.ids.len().checked_sub(1)?;
        self.state
            .ids
            .get(self.state.idx.min(last))
            .map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        !self.state.ids.is_empty() && self.state.idx >= self.state.ids.len()
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    fn persist(&self) {
        if let Err(err) = self
            .store
            .save(&self.settings.storage_key, &self.state.to_persisted())
        {
            tracing::warn!("schedule not persisted: {err:#}");
        }
    }
}
