//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use sqlx::sqlite::SqlitePool;

use crate::source::Direction;

/// Schema of the help-desk store, as far as this crate reads it.
pub const SCHEMA: &[&str] = &[
    r"CREATE TABLE InboundMessages (
        ID INTEGER PRIMARY KEY,
        EmailFrom TEXT, EmailPrimaryTo TEXT, EmailTo TEXT, EmailCc TEXT, EmailBcc TEXT,
        EmailDateTime TEXT, Subject TEXT, Body TEXT)",
    r"CREATE TABLE OutboundMessages (
        ID INTEGER PRIMARY KEY,
        EmailFrom TEXT, EmailPrimaryTo TEXT, EmailTo TEXT, EmailCc TEXT, EmailBcc TEXT,
        EmailDateTime TEXT, Subject TEXT, Body TEXT)",
    r"CREATE TABLE Attachments (
        ID INTEGER PRIMARY KEY, FileName TEXT, AttachmentLocation TEXT)",
    r"CREATE TABLE InboundMessageAttachments (MessageID INTEGER, AttachmentID INTEGER)",
    r"CREATE TABLE OutboundMessageAttachments (MessageID INTEGER, AttachmentID INTEGER)",
    r"CREATE TABLE Agents (ID INTEGER PRIMARY KEY, Name TEXT, IsActive INTEGER NOT NULL DEFAULT 1)",
    r"CREATE TABLE Tickets (
        ID INTEGER PRIMARY KEY, Subject TEXT, Status TEXT NOT NULL,
        IsDeleted INTEGER NOT NULL DEFAULT 0)",
];

/// A message row to insert.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: i64,
    pub from: String,
    pub primary_to: String,
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub date: String,
    pub subject: String,
    pub body: String,
}

impl NewMessage {
    /// A plain message with the given id and stored date text.
    pub fn at(id: i64, date: &str) -> Self {
        Self {
            id,
            from: "Sender <sender@example.com>".to_string(),
            primary_to: "primary@example.com".to_string(),
            to: "rcpt@example.com".to_string(),
            cc: String::new(),
            bcc: String::new(),
            date: date.to_string(),
            subject: format!("Subject {id}"),
            body: format!("Body {id}"),
        }
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn sender(mut self, from: &str) -> Self {
        self.from = from.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

/// In-memory database with the help-desk schema.
pub struct Fixture {
    pub pool: SqlitePool,
}

impl Fixture {
    pub async fn new() -> Self {
        let pool = crate::database::in_memory().await.unwrap();
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&pool).await.unwrap();
        }
        Self { pool }
    }

    pub async fn insert(&self, direction: Direction, message: NewMessage) {
        let sql = format!(
            "INSERT INTO {} (ID, EmailFrom, EmailPrimaryTo, EmailTo, EmailCc, EmailBcc,
                             EmailDateTime, Subject, Body)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            direction.message_table()
        );
        sqlx::query(&sql)
            .bind(message.id)
            .bind(message.from)
            .bind(message.primary_to)
            .bind(message.to)
            .bind(message.cc)
            .bind(message.bcc)
            .bind(message.date)
            .bind(message.subject)
            .bind(message.body)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn attach(
        &self,
        direction: Direction,
        message_id: i64,
        attachment_id: i64,
        file_name: &str,
        location: &str,
    ) {
        sqlx::query("INSERT INTO Attachments (ID, FileName, AttachmentLocation) VALUES (?, ?, ?)")
            .bind(attachment_id)
            .bind(file_name)
            .bind(location)
            .execute(&self.pool)
            .await
            .unwrap();

        let sql = format!(
            "INSERT INTO {} (MessageID, AttachmentID) VALUES (?, ?)",
            direction.attachment_link_table()
        );
        sqlx::query(&sql)
            .bind(message_id)
            .bind(attachment_id)
            .execute(&self.pool)
            .await
            .unwrap();
    }
}
