//! Export run results.

use serde::Serialize;

use crate::source::Direction;

/// Counts for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectionSummary {
    /// Direction these counts belong to.
    pub direction: Direction,
    /// Files written.
    pub exported: u64,
    /// Records skipped because of an error.
    pub failed: u64,
}

impl DirectionSummary {
    /// Empty counts for `direction`.
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            exported: 0,
            failed: 0,
        }
    }
}

/// Outcome of a whole export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Per-direction counts, in processing order.
    pub directions: Vec<DirectionSummary>,
    /// True when the run stopped early on request.
    pub cancelled: bool,
}

impl ExportReport {
    /// Total files written.
    #[must_use]
    pub fn exported(&self) -> u64 {
        self.directions.iter().map(|d| d.exported).sum()
    }

    /// Total records skipped.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.directions.iter().map(|d| d.failed).sum()
    }

    /// Counts for one direction, if it was processed.
    #[must_use]
    pub fn direction(&self, direction: Direction) -> Option<&DirectionSummary> {
        self.directions.iter().find(|d| d.direction == direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let report = ExportReport {
            directions: vec![
                DirectionSummary {
                    direction: Direction::Inbound,
                    exported: 3,
                    failed: 1,
                },
                DirectionSummary {
                    direction: Direction::Outbound,
                    exported: 2,
                    failed: 0,
                },
            ],
            cancelled: false,
        };

        assert_eq!(report.exported(), 5);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.direction(Direction::Outbound).map(|d| d.exported), Some(2));
    }
}
