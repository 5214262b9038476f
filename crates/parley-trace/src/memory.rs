//! In-memory implementation of `TraceWriter`.
//!
//! `InMemoryTraceWriter` keeps every `IterationRecord` in append order.
//! Clones share the same store, so a caller can keep one clone for
//! inspection after handing another to an agent builder.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use parley_contracts::{
    error::ParleyResult,
    execution::{CallId, IterationRecord},
};
use parley_core::traits::TraceWriter;

/// A snapshot of every record written so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLog {
    /// All records in append order.
    pub records: Vec<IterationRecord>,

    /// Wall-clock time (UTC) the snapshot was taken.
    pub exported_at: DateTime<Utc>,
}

impl TraceLog {
    /// Records belonging to one call, in iteration order.
    pub fn call(&self, call_id: CallId) -> impl Iterator<Item = &IterationRecord> {
        self.records.iter().filter(move |r| r.call_id == call_id)
    }

    /// Distinct call ids in first-seen order.
    pub fn call_ids(&self) -> Vec<CallId> {
        let mut ids: Vec<CallId> = Vec::new();
        for record in &self.records {
            if !ids.contains(&record.call_id) {
                ids.push(record.call_id);
            }
        }
        ids
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTraceWriter {
    records: Rc<RefCell<Vec<IterationRecord>>>,
}

impl InMemoryTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a `TraceLog` containing all records written so far.
    pub fn export(&self) -> TraceLog {
        TraceLog {
            records: self.records.borrow().clone(),
            exported_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Records written so far, in append order.
    pub fn records(&self) -> Ref<'_, Vec<IterationRecord>> {
        self.records.borrow()
    }
}

// ── TraceWriter impl ─────────────────────────────────────────────────────────

impl TraceWriter for InMemoryTraceWriter {
    fn write(&self, record: &IterationRecord) -> ParleyResult<()> {
        debug!(
            agent = %record.agent,
            call_id = %record.call_id,
            iteration = record.iteration,
            "trace record appended"
        );
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}
