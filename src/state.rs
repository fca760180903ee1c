use crate::tracker::Tracker;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<Tracker>>,
    pub today: Arc<RwLock<NaiveDate>>,
}

impl AppState {
    pub fn new(tracker: Tracker, today: NaiveDate) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            today: Arc::new(RwLock::new(today)),
        }
    }

    pub async fn today(&self) -> NaiveDate {
        *self.today.read().await
    }
}
