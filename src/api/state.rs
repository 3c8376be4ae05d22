//! Application state for the covenant schedule API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::schedule::ScheduleGenerator;
use crate::store::SqliteScheduleStore;

/// Shared application state.
///
/// The generator is immutable after construction and shared read-only. The
/// store holds one SQLite connection, so writers are serialized behind a
/// mutex.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<ScheduleGenerator>,
    store: Arc<Mutex<SqliteScheduleStore>>,
}

impl AppState {
    /// Creates application state from a generator and an opened store.
    pub fn new(generator: ScheduleGenerator, store: SqliteScheduleStore) -> Self {
        Self {
            generator: Arc::new(generator),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Returns the schedule generator.
    pub fn generator(&self) -> &ScheduleGenerator {
        &self.generator
    }

    /// Returns the store guarded by its mutex.
    pub fn store(&self) -> &Mutex<SqliteScheduleStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
