//! Reporting models.

use serde::Serialize;

/// Number of live tickets in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// Status name as stored.
    pub status: String,
    /// Tickets in this status.
    pub count: i64,
}

/// Help-desk headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Agents marked active.
    pub active_agents: i64,
    /// Non-deleted tickets per status, ordered by status name.
    pub tickets_by_status: Vec<StatusCount>,
}

impl Totals {
    /// Sum of all non-deleted tickets.
    #[must_use]
    pub fn open_tickets(&self) -> i64 {
        self.tickets_by_status.iter().map(|s| s.count).sum()
    }
}
