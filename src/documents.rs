use crate::achievements;
use crate::errors::ServiceError;
use crate::models::{DailyLog, Document};
use crate::seed::initial_document;
use crate::stats::{date_key, last_n_days, DEFAULT_WINDOW};
use crate::storage::DocumentStore;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Outcome of a log save.
#[derive(Debug)]
pub struct SavedLog {
    pub document: Document,
    /// Indices into `achievement_badges` that were earned by this save.
    pub newly_earned: Vec<usize>,
}

/// Read and read-modify-write operations over the single stored document.
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    profile_name: String,
    write_lock: Mutex<()>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>, profile_name: impl Into<String>) -> Self {
        Self {
            store,
            profile_name: profile_name.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Writes the seed document if the store is empty. Returns whether it did.
    pub async fn ensure_initialized(&self, today: NaiveDate) -> Result<bool, ServiceError> {
        let _guard = self.write_lock.lock().await;
        if self.store.get().await?.is_some() {
            return Ok(false);
        }
        self.seed(today).await?;
        Ok(true)
    }

    pub async fn get_document(&self, today: NaiveDate) -> Result<Document, ServiceError> {
        if let Some(document) = self.store.get().await? {
            return Ok(document);
        }
        let _guard = self.write_lock.lock().await;
        self.load_or_seed(today).await
    }

    pub async fn save_log(&self, candidate: DailyLog, today: NaiveDate) -> Result<SavedLog, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_or_seed(today).await?;

        upsert_log(&mut document, candidate);
        recompute_profile(&mut document);

        let last_week = last_n_days(&document, DEFAULT_WINDOW, today);
        let newly_earned = achievements::evaluate(
            &mut document.achievement_badges,
            &last_week,
            &document.daily_logs,
        );

        self.store.set(&document).await?;
        Ok(SavedLog {
            document,
            newly_earned,
        })
    }

    async fn load_or_seed(&self, today: NaiveDate) -> Result<Document, ServiceError> {
        match self.store.get().await? {
            Some(document) => Ok(document),
            None => self.seed(today).await,
        }
    }

    async fn seed(&self, today: NaiveDate) -> Result<Document, ServiceError> {
        let document = initial_document(&self.profile_name, &date_key(today))
            .map_err(|err| ServiceError::Unhandled(format!("seed content is invalid: {err}")))?;
        self.store.set(&document).await?;
        info!("initialized document store");
        Ok(document)
    }
}

/// Replaces the log with the same date in place, or appends a new one.
pub fn upsert_log(document: &mut Document, candidate: DailyLog) {
    match document
        .daily_logs
        .iter_mut()
        .find(|log| log.date == candidate.date)
    {
        Some(existing) => *existing = candidate,
        None => document.daily_logs.push(candidate),
    }
}

/// Both counters are the raw number of stored logs. `streak_count` is not a
/// consecutive-day streak; see [`crate::stats::consecutive_streak`] for that.
pub fn recompute_profile(document: &mut Document) {
    let count = document.daily_logs.len();
    document.user_profile.days_completed = count;
    document.user_profile.streak_count = count;
}
