use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayView {
    pub day: usize,
    pub completed: bool,
    pub available: bool,
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub available_days: usize,
    pub progress_percent: f64,
    pub completed_count: usize,
    pub days: Vec<DayView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub today: String,
    pub available_days: usize,
    pub total_days: usize,
    pub progress_percent: f64,
    pub participants: Vec<ParticipantView>,
}

/// Initial values for the check-in dialog of one day.
#[derive(Debug, Serialize, Deserialize)]
pub struct DraftResponse {
    pub participant: String,
    pub day: usize,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub participant: String,
    pub day: usize,
    pub celebrate: bool,
    pub completed_count: usize,
    pub record: DayView,
}
