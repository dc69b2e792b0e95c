use std::{collections::BTreeMap, sync::Arc};

use hashbrown::HashMap;
use parking_lot::Mutex;

use super::{TableValue, TelemetryError, Transport};

#[derive(Debug, Default)]
struct MemoryTableInner {
    values: HashMap<String, HashMap<String, TableValue>>,
    connected_team: Option<u16>,
    writes: usize,
}

/// In-process [Transport]
///
/// Clones share the same storage, so a handle can be kept to inspect what a
/// session published.
#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    inner: Arc<Mutex<MemoryTableInner>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, table: &str, key: &str) -> Option<TableValue> {
        let inner = self.inner.lock();
        inner.values.get(table)?.get(key).cloned()
    }

    /// Set a value directly (e.g. to stand in for the field management system)
    pub fn insert(&self, table: &str, key: &str, value: TableValue) {
        let mut inner = self.inner.lock();
        inner.values
            .entry_ref(table)
            .or_default()
            .insert(key.into(), value);
    }

    /// Team number of the active connection
    pub fn connected_team(&self) -> Option<u16> {
        self.inner.lock().connected_team
    }

    /// Total number of values written through the [Transport] interface
    pub fn writes(&self) -> usize {
        self.inner.lock().writes
    }

    /// Dump every table as JSON, with tables and keys sorted
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let inner = self.inner.lock();
        let snapshot = inner.values
            .iter()
            .map(|(table, entries)| {
                let entries = entries.iter()
                    .map(|(key, value)| (key.as_str(), value))
                    .collect::<BTreeMap<_, _>>();
                (table.as_str(), entries)
            })
            .collect::<BTreeMap<_, _>>();
        serde_json::to_string_pretty(&snapshot)
    }
}

impl Transport for MemoryTable {
    fn connect(&mut self, team_number: u16) -> Result<(), TelemetryError> {
        self.inner.lock().connected_team = Some(team_number);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.inner.lock().connected_team = None;
    }

    fn put(&mut self, table: &str, key: &str, value: TableValue) -> Result<(), TelemetryError> {
        let mut inner = self.inner.lock();
        if inner.connected_team.is_none() {
            return Err(TelemetryError::Transport(format!("not connected (writing {table}/{key})")));
        }
        inner.writes += 1;
        inner.values
            .entry_ref(table)
            .or_default()
            .insert(key.into(), value);
        Ok(())
    }

    fn get(&self, table: &str, key: &str) -> Option<TableValue> {
        MemoryTable::get(self, table, key)
    }
}
