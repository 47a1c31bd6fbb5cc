//! Agent and ticket queries.

use sqlx::Row;
use sqlx::sqlite::SqlitePool;

use super::model::{StatusCount, Totals};
use crate::{Error, Result};

/// Reporting and ticket maintenance.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    /// Creates a repository over an open pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Counts active agents and live tickets per status.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn totals(&self) -> Result<Totals> {
        let active_agents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM Agents WHERE IsActive <> 0")
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            r"
            SELECT Status, COUNT(*) AS Count
            FROM Tickets
            WHERE IsDeleted = 0
            GROUP BY Status
            ORDER BY Status ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let tickets_by_status = rows
            .iter()
            .map(|row| {
                Ok(StatusCount {
                    status: row.try_get("Status")?,
                    count: row.try_get("Count")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Totals {
            active_agents,
            tickets_by_status,
        })
    }

    /// Marks a ticket as deleted, keeping its row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TicketNotFound`] if no ticket has this id.
    pub async fn soft_delete_ticket(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE Tickets SET IsDeleted = 1 WHERE ID = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::TicketNotFound(id));
        }
        tracing::info!("Ticket {id} marked deleted");
        Ok(())
    }

    /// Removes a ticket row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TicketNotFound`] if no ticket has this id.
    pub async fn hard_delete_ticket(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM Tickets WHERE ID = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::TicketNotFound(id));
        }
        tracing::info!("Ticket {id} removed");
        Ok(())
    }
}
