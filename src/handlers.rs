use crate::errors::AppError;
use crate::models::{CheckInRequest, CheckInResponse, ChallengeResponse, DraftResponse, ParticipantView};
use crate::state::AppState;
use crate::stats::{build_challenge_at, build_participant_at, day_view};
use crate::ui::{render_day_page, render_index};
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.today().await;
    let tracker = state.tracker.lock().await;
    Html(render_index(&build_challenge_at(today, &tracker)))
}

pub async fn get_challenge(State(state): State<AppState>) -> Json<ChallengeResponse> {
    let today = state.today().await;
    let tracker = state.tracker.lock().await;
    Json(build_challenge_at(today, &tracker))
}

pub async fn get_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ParticipantView>, AppError> {
    let today = state.today().await;
    let tracker = state.tracker.lock().await;
    let participant = tracker.participant(&id)?;
    Ok(Json(build_participant_at(today, participant)))
}

pub async fn open_day(
    State(state): State<AppState>,
    Path((id, day)): Path<(String, usize)>,
) -> Result<Json<DraftResponse>, AppError> {
    let (_, draft) = load_draft(&state, id, day).await?;
    Ok(Json(draft))
}

pub async fn day_page(
    State(state): State<AppState>,
    Path((id, day)): Path<(String, usize)>,
) -> Result<Html<String>, AppError> {
    let (name, draft) = load_draft(&state, id, day).await?;
    Ok(Html(render_day_page(&name, &draft)))
}

async fn load_draft(
    state: &AppState,
    id: String,
    day: usize,
) -> Result<(String, DraftResponse), AppError> {
    let index = day_index(day)?;
    let today = state.today().await;
    let tracker = state.tracker.lock().await;
    let record = tracker.open_day(&id, index, today)?;
    let name = tracker.participant(&id)?.name.clone();

    Ok((
        name,
        DraftResponse {
            title: record.title.clone().unwrap_or_default(),
            summary: record.summary.clone().unwrap_or_default(),
            participant: id,
            day,
        },
    ))
}

pub async fn check_in(
    State(state): State<AppState>,
    Path((id, day)): Path<(String, usize)>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, AppError> {
    let response = apply_check_in(&state, id, day, payload).await?;
    Ok(Json(response))
}

pub async fn check_in_form(
    State(state): State<AppState>,
    Path((id, day)): Path<(String, usize)>,
    Form(payload): Form<CheckInRequest>,
) -> Result<Redirect, AppError> {
    apply_check_in(&state, id, day, payload).await?;
    Ok(Redirect::to("/"))
}

async fn apply_check_in(
    state: &AppState,
    id: String,
    day: usize,
    payload: CheckInRequest,
) -> Result<CheckInResponse, AppError> {
    let index = day_index(day)?;
    let today = state.today().await;
    let mut tracker = state.tracker.lock().await;

    // Locked days are never offered to the user, so reaching one here means
    // the request did not come from the page.
    tracker.open_day(&id, index, today)?;

    let outcome = match tracker.check_in(&id, index, &payload.title, &payload.summary) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!("rejected check-in for {id} day {day}: {err}");
            return Err(err.into());
        }
    };
    let completed_count = tracker.participant(&id)?.completed_count();
    info!(
        "check-in for {id} day {day}{}",
        if outcome.celebrate { " (first completion)" } else { " (edited)" }
    );

    Ok(CheckInResponse {
        record: day_view(index, &outcome.record, true),
        participant: id,
        day,
        celebrate: outcome.celebrate,
        completed_count,
    })
}

fn day_index(day: usize) -> Result<usize, AppError> {
    day.checked_sub(1)
        .ok_or_else(|| AppError::not_found("days are numbered from 1"))
}
