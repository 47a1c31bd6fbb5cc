//! Message and attachment queries.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use super::model::{AttachmentRef, Direction, MessageRecord};
use crate::options::TimeRange;
use crate::{Error, Result};

/// Rows fetched per round trip by [`RecordCursor`].
const PAGE_SIZE: u32 = 200;

/// Format produced by `SQLite`'s `datetime()`.
const SQL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

fn to_sql_datetime(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(SQL_DATETIME).to_string()
}

/// Read-only access to the message tables.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Creates a repository over an open pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a lazy cursor over one direction's messages within `range`,
    /// ordered by timestamp then identifier.
    #[must_use]
    pub const fn records(&self, direction: Direction, range: TimeRange) -> RecordCursor<'_> {
        RecordCursor {
            repo: self,
            direction,
            range,
            buffer: VecDeque::new(),
            last_key: None,
            exhausted: false,
        }
    }

    /// Fetches one page of records strictly after `after`.
    async fn fetch_page(
        &self,
        direction: Direction,
        range: &TimeRange,
        after: Option<&(String, i64)>,
    ) -> Result<Vec<MessageRecord>> {
        let sql = format!(
            r"
            SELECT ID,
                   CAST(EmailFrom AS BLOB) AS EmailFrom,
                   CAST(EmailPrimaryTo AS BLOB) AS EmailPrimaryTo,
                   CAST(EmailTo AS BLOB) AS EmailTo,
                   CAST(EmailCc AS BLOB) AS EmailCc,
                   CAST(EmailBcc AS BLOB) AS EmailBcc,
                   datetime(EmailDateTime) AS SentAt,
                   CAST(Subject AS BLOB) AS Subject,
                   CAST(Body AS BLOB) AS Body
            FROM {table}
            WHERE datetime(EmailDateTime) IS NOT NULL
              AND (?1 IS NULL OR datetime(EmailDateTime) >= ?1)
              AND (?2 IS NULL OR datetime(EmailDateTime) < ?2)
              AND (?3 IS NULL
                   OR datetime(EmailDateTime) > ?3
                   OR (datetime(EmailDateTime) = ?3 AND ID > ?4))
            ORDER BY datetime(EmailDateTime) ASC, ID ASC
            LIMIT ?5
            ",
            table = direction.message_table()
        );

        let rows = sqlx::query(&sql)
            .bind(range.from.as_ref().map(to_sql_datetime))
            .bind(range.to.as_ref().map(to_sql_datetime))
            .bind(after.map(|(ts, _)| ts.clone()))
            .bind(after.map_or(0, |(_, id)| *id))
            .bind(PAGE_SIZE)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| record_from_row(row, direction)).collect()
    }

    /// Counts rows whose timestamp is missing or unreadable; such rows are
    /// never exported.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_undated(&self, direction: Direction) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE datetime(EmailDateTime) IS NULL",
            direction.message_table()
        );
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Lists the attachments linked to a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn attachments(
        &self,
        direction: Direction,
        message_id: i64,
    ) -> Result<Vec<AttachmentRef>> {
        let sql = format!(
            r"
            SELECT a.ID,
                   CAST(a.FileName AS BLOB) AS FileName,
                   CAST(a.AttachmentLocation AS BLOB) AS AttachmentLocation
            FROM {link} l
            JOIN Attachments a ON a.ID = l.AttachmentID
            WHERE l.MessageID = ?
            ORDER BY a.ID ASC
            ",
            link = direction.attachment_link_table()
        );

        let rows = sqlx::query(&sql)
            .bind(message_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("ID")?;
                let label = format!("Attachment #{id}");
                Ok(AttachmentRef {
                    id,
                    file_name: lossy_text(row, "FileName", &label)?,
                    location: lossy_text(row, "AttachmentLocation", &label)?,
                })
            })
            .collect()
    }
}

/// Reads a text column from its raw bytes. NULL becomes empty and invalid
/// UTF-8 is replaced, so one damaged value cannot fail a whole page.
fn lossy_text(row: &SqliteRow, column: &str, label: &str) -> Result<String> {
    let bytes = row
        .try_get::<Option<Vec<u8>>, _>(column)?
        .unwrap_or_default();

    Ok(String::from_utf8(bytes).unwrap_or_else(|e| {
        tracing::warn!("{label}: {column} is not valid UTF-8, replacing bad bytes");
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    }))
}

fn record_from_row(row: &SqliteRow, direction: Direction) -> Result<MessageRecord> {
    let id: i64 = row.try_get("ID")?;
    let label = format!("{direction} #{id}");
    let text = |column: &str| lossy_text(row, column, &label);

    let sent_at: String = row.try_get("SentAt")?;
    let timestamp = NaiveDateTime::parse_from_str(&sent_at, SQL_DATETIME)
        .map_err(|e| Error::InvalidData(format!("EmailDateTime {sent_at:?}: {e}")))?
        .and_utc();

    Ok(MessageRecord {
        id,
        direction,
        from: text("EmailFrom")?,
        primary_to: text("EmailPrimaryTo")?,
        to: text("EmailTo")?,
        cc: text("EmailCc")?,
        bcc: text("EmailBcc")?,
        timestamp,
        subject: text("Subject")?,
        body: text("Body")?,
    })
}

/// Lazy, ordered sequence of records for one direction.
///
/// Pages are fetched with keyset pagination on `(timestamp, id)`, so no
/// statement stays open between calls and the single pooled connection is
/// free for attachment queries.
#[derive(Debug)]
pub struct RecordCursor<'a> {
    repo: &'a MessageRepository,
    direction: Direction,
    range: TimeRange,
    buffer: VecDeque<MessageRecord>,
    last_key: Option<(String, i64)>,
    exhausted: bool,
}

impl RecordCursor<'_> {
    /// Returns the next record, or `None` when the sequence is finished.
    ///
    /// # Errors
    ///
    /// Returns an error if a page query fails.
    pub async fn next_record(&mut self) -> Result<Option<MessageRecord>> {
        if self.buffer.is_empty() && !self.exhausted {
            let page = self
                .repo
                .fetch_page(self.direction, &self.range, self.last_key.as_ref())
                .await?;

            if page.len() < PAGE_SIZE as usize {
                self.exhausted = true;
            }
            if let Some(last) = page.last() {
                self.last_key = Some((to_sql_datetime(&last.timestamp), last.id));
            }
            self.buffer.extend(page);
        }

        Ok(self.buffer.pop_front())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::parse_time_bound;
    use crate::test_support::{Fixture, NewMessage};

    async fn collect(cursor: &mut RecordCursor<'_>) -> Vec<MessageRecord> {
        let mut records = Vec::new();
        while let Some(record) = cursor.next_record().await.unwrap() {
            records.push(record);
        }
        records
    }

    #[tokio::test]
    async fn test_records_ordered_by_timestamp_then_id() {
        let fixture = Fixture::new().await;
        fixture.insert(Direction::Inbound, NewMessage::at(3, "2024-01-02 08:00:00")).await;
        fixture.insert(Direction::Inbound, NewMessage::at(2, "2024-01-01 09:00:00")).await;
        fixture.insert(Direction::Inbound, NewMessage::at(1, "2024-01-01 09:00:00")).await;
        fixture.insert(Direction::Inbound, NewMessage::at(4, "2023-12-31T23:59:59Z")).await;

        let repo = MessageRepository::new(fixture.pool.clone());
        let records = collect(&mut repo.records(Direction::Inbound, TimeRange::all())).await;

        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [4, 1, 2, 3]);
        assert!(records.windows(2).all(|w| (w[0].timestamp, w[0].id) < (w[1].timestamp, w[1].id)));
    }

    #[tokio::test]
    async fn test_records_respect_half_open_range() {
        let fixture = Fixture::new().await;
        fixture.insert(Direction::Outbound, NewMessage::at(1, "2024-01-01 00:00:00")).await;
        fixture.insert(Direction::Outbound, NewMessage::at(2, "2024-01-01 23:59:59")).await;
        fixture.insert(Direction::Outbound, NewMessage::at(3, "2024-01-02 00:00:00")).await;

        let range = TimeRange::new(
            Some(parse_time_bound("2024-01-01").unwrap()),
            Some(parse_time_bound("2024-01-02").unwrap()),
        )
        .unwrap();
        let repo = MessageRepository::new(fixture.pool.clone());
        let records = collect(&mut repo.records(Direction::Outbound, range)).await;

        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 2]);
        assert!(records.iter().all(|r| range.contains(&r.timestamp)));
    }

    #[tokio::test]
    async fn test_cursor_spans_multiple_pages() {
        let fixture = Fixture::new().await;
        let total = i64::from(PAGE_SIZE) * 2 + 5;
        for id in 1..=total {
            // Every five records share a timestamp to exercise the id tiebreak
            let minute = (id - 1) / 5;
            let ts = format!("2024-02-01 {:02}:{:02}:00", minute / 60, minute % 60);
            fixture.insert(Direction::Inbound, NewMessage::at(id, &ts)).await;
        }

        let repo = MessageRepository::new(fixture.pool.clone());
        let records = collect(&mut repo.records(Direction::Inbound, TimeRange::all())).await;

        assert_eq!(records.len() as i64, total);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=total).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_directions_are_independent() {
        let fixture = Fixture::new().await;
        fixture.insert(Direction::Inbound, NewMessage::at(1, "2024-01-01 00:00:00")).await;

        let repo = MessageRepository::new(fixture.pool.clone());
        let outbound = collect(&mut repo.records(Direction::Outbound, TimeRange::all())).await;
        assert!(outbound.is_empty());
    }

    #[tokio::test]
    async fn test_null_columns_become_empty() {
        let fixture = Fixture::new().await;
        sqlx::query(
            "INSERT INTO InboundMessages (ID, EmailDateTime) VALUES (9, '2024-05-05 05:05:05')",
        )
        .execute(&fixture.pool)
        .await
        .unwrap();

        let repo = MessageRepository::new(fixture.pool.clone());
        let mut cursor = repo.records(Direction::Inbound, TimeRange::all());
        let record = cursor.next_record().await.unwrap().unwrap();
        assert_eq!(record.id, 9);
        assert!(record.from.is_empty());
        assert!(record.subject.is_empty());
        assert!(record.body.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_text_is_decoded_lossily() {
        let fixture = Fixture::new().await;
        sqlx::query(
            "INSERT INTO InboundMessages (ID, EmailFrom, EmailDateTime, Subject, Body)
             VALUES (3, X'6140782E636F6D', '2024-05-05 05:05:05', 42, CAST(X'C328' AS TEXT))",
        )
        .execute(&fixture.pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO Attachments (ID, FileName, AttachmentLocation) VALUES (5, X'FF', 'f')")
            .execute(&fixture.pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO InboundMessageAttachments (MessageID, AttachmentID) VALUES (3, 5)")
            .execute(&fixture.pool)
            .await
            .unwrap();

        let repo = MessageRepository::new(fixture.pool.clone());
        let record = repo
            .records(Direction::Inbound, TimeRange::all())
            .next_record()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.from, "a@x.com");
        assert_eq!(record.subject, "42");
        assert_eq!(record.body, "\u{FFFD}(");

        let attachments = repo.attachments(Direction::Inbound, 3).await.unwrap();
        assert_eq!(attachments[0].file_name, "\u{FFFD}");
        assert_eq!(attachments[0].location, "f");
    }

    #[tokio::test]
    async fn test_undated_rows_are_counted_and_skipped() {
        let fixture = Fixture::new().await;
        fixture.insert(Direction::Inbound, NewMessage::at(1, "not a date")).await;
        fixture.insert(Direction::Inbound, NewMessage::at(2, "2024-01-01 00:00:00")).await;

        let repo = MessageRepository::new(fixture.pool.clone());
        assert_eq!(repo.count_undated(Direction::Inbound).await.unwrap(), 1);
        let records = collect(&mut repo.records(Direction::Inbound, TimeRange::all())).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);
    }

    #[tokio::test]
    async fn test_attachments_for_message() {
        let fixture = Fixture::new().await;
        fixture.insert(Direction::Outbound, NewMessage::at(7, "2024-01-01 00:00:00")).await;
        fixture.attach(Direction::Outbound, 7, 100, "a.txt", "/data/a.txt").await;
        fixture.attach(Direction::Outbound, 7, 101, "b.pdf", "/data/b.pdf").await;
        fixture.attach(Direction::Inbound, 7, 102, "other.txt", "/data/o.txt").await;

        let repo = MessageRepository::new(fixture.pool.clone());
        let attachments = repo.attachments(Direction::Outbound, 7).await.unwrap();
        let names: Vec<&str> = attachments.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.pdf"]);
        assert_eq!(attachments[1].location, "/data/b.pdf");
    }
}
