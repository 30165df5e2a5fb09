use crate::error::PolicyError;
use crate::resolver::{DispatchOutcome, EnforcementAction, LifecycleEvent, ResolutionObserver};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// How a lifecycle event ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    /// The mapped controller call succeeded
    Applied,
    /// The event has no mapped controller call
    Ignored,
    Cancelled,
    Failed(String),
}

/// One handled lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub pu_id: String,
    pub event: LifecycleEvent,
    pub policy_index: String,
    pub action: Option<EnforcementAction>,
    pub correlation_id: Option<Uuid>,
    pub outcome: AuditOutcome,
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} index={} outcome={:?}",
            self.timestamp, self.pu_id, self.event, self.policy_index, self.outcome
        )
    }
}

/// Bounded, thread-safe log of resolution decisions; oldest records are dropped first
#[derive(Debug)]
pub struct AuditLog {
    records: Mutex<VecDeque<AuditRecord>>,
    max_size: usize,
}

impl AuditLog {
    pub fn new(max_size: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(max_size)),
            max_size,
        }
    }

    /// Append a record, evicting the oldest one when at capacity
    pub fn append(&self, record: AuditRecord) {
        if self.max_size == 0 {
            return;
        }
        let mut records = self.records.lock();
        if records.len() >= self.max_size {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// All records, oldest first
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Records for a single workload, oldest first
    pub fn records_for(&self, pu_id: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.pu_id == pu_id)
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl ResolutionObserver for AuditLog {
    fn dispatched(&self, outcome: &DispatchOutcome<'_>) {
        let result = match (outcome.error, outcome.action) {
            (Some(PolicyError::Cancelled), _) => AuditOutcome::Cancelled,
            (Some(err), _) => AuditOutcome::Failed(err.to_string()),
            (None, None) => AuditOutcome::Ignored,
            (None, Some(_)) => AuditOutcome::Applied,
        };

        self.append(AuditRecord {
            timestamp: Utc::now(),
            pu_id: outcome.pu_id.to_string(),
            event: outcome.event,
            policy_index: outcome.policy_index.to_string(),
            action: outcome.action,
            correlation_id: outcome.correlation_id,
            outcome: result,
        });
    }
}
