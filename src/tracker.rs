use chrono::NaiveDate;
use thiserror::Error;

/// Length of the challenge window in days.
pub const CHALLENGE_DAYS: usize = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("unknown participant '{0}'")]
    UnknownParticipant(String),
    #[error("day {} is outside the challenge window", .0.saturating_add(1))]
    DayOutOfRange(usize),
    #[error("day {} is not unlocked yet", .0.saturating_add(1))]
    DayLocked(usize),
    #[error("participant roster is empty")]
    EmptyRoster,
    #[error("participant id '{0}' is used more than once")]
    DuplicateParticipant(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayRecord {
    pub completed: bool,
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    days: [DayRecord; CHALLENGE_DAYS],
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date,
            days: std::array::from_fn(|_| DayRecord::default()),
        }
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn day(&self, index: usize) -> Option<&DayRecord> {
        self.days.get(index)
    }

    pub fn available_days(&self, today: NaiveDate) -> usize {
        compute_available_days(self.start_date, today)
    }

    pub fn completed_count(&self) -> usize {
        self.days.iter().filter(|day| day.completed).count()
    }
}

/// Result of an accepted check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub record: DayRecord,
    /// True only when the slot went from incomplete to complete.
    pub celebrate: bool,
}

/// Number of unlocked days for a participant who started on `start`.
///
/// Counts the start day itself, so the first day is unlocked immediately.
/// A start date in the future still unlocks day one, and the count never
/// grows past the challenge window.
pub fn compute_available_days(start: NaiveDate, today: NaiveDate) -> usize {
    let elapsed = (today - start).num_days();
    (elapsed + 1).clamp(1, CHALLENGE_DAYS as i64) as usize
}

pub fn is_available(day_index: usize, available_count: usize) -> bool {
    day_index < available_count
}

/// Progress of a window with `available_count` unlocked days, in percent.
pub fn progress_percent(available_count: usize) -> f64 {
    available_count as f64 / CHALLENGE_DAYS as f64 * 100.0
}

/// The roster of participants and their day logs.
///
/// The first participant is the anchor: its start date drives the overall
/// challenge progress.
#[derive(Debug, Clone)]
pub struct Tracker {
    participants: Vec<Participant>,
}

impl Tracker {
    /// Builds a tracker from a non-empty roster with unique ids.
    pub fn new(participants: Vec<Participant>) -> Result<Self, TrackerError> {
        if participants.is_empty() {
            return Err(TrackerError::EmptyRoster);
        }
        for (index, participant) in participants.iter().enumerate() {
            if participants[..index].iter().any(|other| other.id == participant.id) {
                return Err(TrackerError::DuplicateParticipant(participant.id.clone()));
            }
        }
        Ok(Self { participants })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn anchor(&self) -> &Participant {
        &self.participants[0]
    }

    pub fn participant(&self, id: &str) -> Result<&Participant, TrackerError> {
        self.participants
            .iter()
            .find(|participant| participant.id == id)
            .ok_or_else(|| TrackerError::UnknownParticipant(id.to_string()))
    }

    fn participant_mut(&mut self, id: &str) -> Result<&mut Participant, TrackerError> {
        self.participants
            .iter_mut()
            .find(|participant| participant.id == id)
            .ok_or_else(|| TrackerError::UnknownParticipant(id.to_string()))
    }

    /// Overall challenge progress, pinned to the anchor's start date.
    pub fn aggregate_progress(&self, today: NaiveDate) -> f64 {
        progress_percent(self.anchor().available_days(today))
    }

    /// Looks up a day that the caller is allowed to open today.
    pub fn open_day(
        &self,
        id: &str,
        day_index: usize,
        today: NaiveDate,
    ) -> Result<&DayRecord, TrackerError> {
        let participant = self.participant(id)?;
        let record = participant
            .day(day_index)
            .ok_or(TrackerError::DayOutOfRange(day_index))?;
        if !is_available(day_index, participant.available_days(today)) {
            return Err(TrackerError::DayLocked(day_index));
        }
        Ok(record)
    }

    /// Marks a day complete, overwriting any earlier check-in.
    ///
    /// The title is trimmed and must be non-empty; the summary is kept as
    /// given. Availability is the caller's concern.
    pub fn check_in(
        &mut self,
        id: &str,
        day_index: usize,
        title: &str,
        summary: &str,
    ) -> Result<CheckInOutcome, TrackerError> {
        let participant = self.participant_mut(id)?;
        let slot = participant
            .days
            .get_mut(day_index)
            .ok_or(TrackerError::DayOutOfRange(day_index))?;

        let title = title.trim();
        if title.is_empty() {
            return Err(TrackerError::EmptyTitle);
        }

        let celebrate = !slot.completed;
        *slot = DayRecord {
            completed: true,
            title: Some(title.to_string()),
            summary: Some(summary.to_string()),
        };

        Ok(CheckInOutcome {
            record: slot.clone(),
            celebrate,
        })
    }
}
