//! Bounded security event log
//!
//! Append-only ring buffer of every security-relevant decision. The cap is
//! a memory bound, not a durability guarantee: once full, the oldest events
//! are evicted. Severity and action counts feed the stats surface.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use ringbuffer::{AllocRingBuffer, RingBuffer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// What part of the marketplace produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Trade,
    Mint,
    Reveal,
    Admin,
    Error,
    Security,
}

/// Escalation level; ordering follows severity, so `High < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Immutable record of one security-relevant decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: EventCategory,
    pub severity: Severity,
    /// Actor the decision concerned, if any
    pub actor: Option<String>,
    /// Stable machine-readable label, e.g. `trade_validation`
    pub action: String,
    pub amount: Option<Decimal>,
    /// Free-text explanation for human readers
    pub detail: String,
    /// Network origin of the triggering request
    pub origin: Option<String>,
    /// Client identification string of the triggering request
    pub client: Option<String>,
}

/// Event fields supplied by the caller; id and timestamp are assigned on record
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub category: EventCategory,
    pub severity: Severity,
    pub actor: Option<String>,
    pub action: String,
    pub amount: Option<Decimal>,
    pub detail: String,
    pub origin: Option<String>,
    pub client: Option<String>,
}

impl EventDraft {
    /// Draft with only the required fields set
    pub fn new(category: EventCategory, severity: Severity, action: &str, detail: &str) -> Self {
        Self {
            category,
            severity,
            actor: None,
            action: action.to_string(),
            amount: None,
            detail: detail.to_string(),
            origin: None,
            client: None,
        }
    }
}

/// Bounded, concurrency-safe audit trail
pub struct AuditLog {
    enabled: bool,
    events: RwLock<AllocRingBuffer<SecurityEvent>>,
}

impl AuditLog {
    pub fn new(enabled: bool, capacity: usize) -> Self {
        Self {
            enabled,
            events: RwLock::new(AllocRingBuffer::new(capacity)),
        }
    }

    /// Append a fully-populated event, assigning id and timestamp
    ///
    /// Returns the new event id, or `None` when audit logging is disabled.
    pub fn record(&self, draft: EventDraft) -> Option<Uuid> {
        if !self.enabled {
            return None;
        }

        let event = SecurityEvent {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            category: draft.category,
            severity: draft.severity,
            actor: draft.actor,
            action: draft.action,
            amount: draft.amount,
            detail: draft.detail,
            origin: draft.origin,
            client: draft.client,
        };

        match event.severity {
            Severity::Critical => error!("Security event [{}]: {}", event.action, event.detail),
            Severity::High => warn!("Security event [{}]: {}", event.action, event.detail),
            _ => debug!("Security event [{}]: {}", event.action, event.detail),
        }

        let id = event.id;
        self.events.write().push(event);
        Some(id)
    }

    /// Most recent events, newest first
    pub fn recent(&self, limit: usize) -> Vec<SecurityEvent> {
        let log = self.events.read();
        let events: Vec<SecurityEvent> = log.iter().cloned().collect();
        events.into_iter().rev().take(limit).collect()
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Retained events at or above a severity floor
    pub fn count_at_least(&self, floor: Severity) -> usize {
        self.events
            .read()
            .iter()
            .filter(|event| event.severity >= floor)
            .count()
    }

    /// Retained events carrying a given action label
    pub fn count_by_action(&self, action: &str) -> usize {
        self.events
            .read()
            .iter()
            .filter(|event| event.action == action)
            .count()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
