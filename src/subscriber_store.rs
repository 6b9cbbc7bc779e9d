use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber_email::SubscriberEmail;

const CSV_HEADER: &str = "email,subscribed_at\n";

/// Append-only CSV storage for subscribers.
///
/// Rows are `email,subscribed_at` with the header written the first time the
/// file is created. Emails are stored verbatim, without quoting or escaping.
pub struct SubscriberStore {
    subscribers_file: PathBuf,
    // Serializes the header check with the append so concurrent requests
    // cannot duplicate the header or interleave rows
    write_lock: Mutex<()>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to write to the subscribers file: {0}")]
    Io(#[from] std::io::Error),
}

impl SubscriberStore {
    pub fn new(subscribers_file: PathBuf) -> Self {
        Self {
            subscribers_file,
            write_lock: Mutex::new(()),
        }
    }

    pub fn get_subscribers_file(&self) -> &PathBuf {
        &self.subscribers_file
    }

    /// Appends one subscriber row, stamped with the current wall-clock time,
    /// creating the file with its header when it does not exist yet.
    pub fn append(&self, new_subscriber: &NewSubscriber) -> Result<DateTime<Utc>, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.subscribers_file)?;

        // The file was just created (or is otherwise empty): write the header
        // before the first row
        if file.metadata()?.len() == 0 {
            file.write_all(CSV_HEADER.as_bytes())?;
        }

        let subscribed_at = Utc::now();
        let row = format!(
            "{},{}\n",
            new_subscriber.email.as_ref(),
            subscribed_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        );

        file.write_all(row.as_bytes())?;

        Ok(subscribed_at)
    }

    /// All subscribed emails, in append order. A store that was never written
    /// to has no subscribers.
    pub fn list(&self) -> Result<Vec<SubscriberEmail>, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let content = match std::fs::read_to_string(&self.subscribers_file) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        let emails = content
            .lines()
            .skip(1)
            .filter_map(|row| row.split_once(','))
            .filter_map(|(email, _)| SubscriberEmail::parse(String::from(email)).ok())
            .collect();

        Ok(emails)
    }
}
