use crate::models::{ChallengeResponse, DayView, ParticipantView};
use crate::tracker::{is_available, progress_percent, DayRecord, Participant, Tracker, CHALLENGE_DAYS};
use chrono::NaiveDate;

pub fn build_challenge_at(today: NaiveDate, tracker: &Tracker) -> ChallengeResponse {
    let participants = tracker
        .participants()
        .iter()
        .map(|participant| build_participant_at(today, participant))
        .collect();

    ChallengeResponse {
        today: today.to_string(),
        available_days: tracker.anchor().available_days(today),
        total_days: CHALLENGE_DAYS,
        progress_percent: tracker.aggregate_progress(today),
        participants,
    }
}

pub fn build_participant_at(today: NaiveDate, participant: &Participant) -> ParticipantView {
    let available = participant.available_days(today);
    let days = participant
        .days()
        .iter()
        .enumerate()
        .map(|(index, record)| day_view(index, record, is_available(index, available)))
        .collect();

    ParticipantView {
        id: participant.id.clone(),
        name: participant.name.clone(),
        start_date: participant.start_date.to_string(),
        available_days: available,
        progress_percent: progress_percent(available),
        completed_count: participant.completed_count(),
        days,
    }
}

/// Days are numbered from 1 in every view.
pub fn day_view(index: usize, record: &DayRecord, available: bool) -> DayView {
    DayView {
        day: index + 1,
        completed: record.completed,
        available,
        title: record.title.clone(),
        summary: record.summary.clone(),
    }
}
