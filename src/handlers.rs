use crate::dashboard::{dispatch, DashboardEvent, DashboardState, Effect, LogForm, Tab};
use crate::errors::{AppError, ServiceError};
use crate::models::{DailyLog, Document, SaveLogResponse, StatsResponse};
use crate::state::AppState;
use crate::stats::{build_stats_at, date_key, today, DEFAULT_WINDOW};
use crate::ui::render_dashboard;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Form, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

const READ_FAILED: &str = "Error reading database";
const SAVE_FAILED: &str = "Error saving log";
const SAVE_OK: &str = "Log saved successfully";
const MAX_STATS_WINDOW: usize = 366;

pub async fn get_data(State(state): State<AppState>) -> Result<Json<Document>, AppError> {
    let document = state
        .documents
        .get_document(today())
        .await
        .map_err(|err| AppError::internal(&err, READ_FAILED))?;
    Ok(Json(document))
}

pub async fn save_log(
    State(state): State<AppState>,
    payload: Result<Json<DailyLog>, JsonRejection>,
) -> Result<Json<SaveLogResponse>, AppError> {
    let Json(candidate) = payload.map_err(|rejection| {
        warn!("rejected log payload: {rejection}");
        AppError::bad_request(rejection.body_text())
    })?;
    if candidate.date.trim().is_empty() {
        return Err(AppError::bad_request("date is required"));
    }

    let date = candidate.date.clone();
    let saved = state
        .documents
        .save_log(candidate, today())
        .await
        .map_err(|err| AppError::internal(&err, SAVE_FAILED))?;
    info!(%date, logs = saved.document.daily_logs.len(), "saved daily log");

    Ok(Json(SaveLogResponse {
        message: SAVE_OK.to_string(),
        data: saved.document,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub date: Option<NaiveDate>,
    pub days: Option<usize>,
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let reference = query.date.unwrap_or_else(today);
    let window = query.days.unwrap_or(DEFAULT_WINDOW);
    if window > MAX_STATS_WINDOW {
        return Err(AppError::bad_request(format!(
            "days must be at most {MAX_STATS_WINDOW}"
        )));
    }

    let document = state
        .documents
        .get_document(today())
        .await
        .map_err(|err| AppError::internal(&err, READ_FAILED))?;
    let stats = build_stats_at(reference, window, &document)
        .ok_or_else(|| AppError::bad_request(format!("date {reference} is out of range")))?;
    Ok(Json(stats))
}

pub async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let today = today();
    let document = state
        .documents
        .get_document(today)
        .await
        .map_err(|err| AppError::internal(&err, READ_FAILED))?;
    let body = serde_json::to_string_pretty(&document)
        .map_err(|err| AppError::internal(&ServiceError::Unhandled(err.to_string()), READ_FAILED))?;

    let disposition = format!(
        "attachment; filename=\"monk-mode-data-{}.json\"",
        date_key(today)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub tab: Option<Tab>,
}

pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    let mut view = DashboardState::new(today());
    load_into(&state, &mut view).await;
    dispatch(&mut view, DashboardEvent::SwitchTab(query.tab.unwrap_or_default()));
    Html(render_dashboard(&view))
}

pub async fn submit_log_form(State(state): State<AppState>, Form(form): Form<LogForm>) -> Html<String> {
    let mut view = DashboardState::new(today());
    dispatch(&mut view, DashboardEvent::SwitchTab(Tab::Daily));

    let effects = dispatch(&mut view, DashboardEvent::SubmitLog(form.into_log()));
    for effect in effects {
        match effect {
            Effect::SaveLog(log) => match state.documents.save_log(log, view.today).await {
                Ok(saved) => {
                    dispatch(
                        &mut view,
                        DashboardEvent::Saved {
                            document: saved.document,
                            newly_earned: saved.newly_earned,
                        },
                    );
                }
                Err(err) => {
                    tracing::error!("{SAVE_FAILED}: {err}");
                    if view.document.is_none() {
                        load_into(&state, &mut view).await;
                    }
                    dispatch(&mut view, DashboardEvent::SaveFailed);
                }
            },
        }
    }

    Html(render_dashboard(&view))
}

async fn load_into(state: &AppState, view: &mut DashboardState) {
    let event = match state.documents.get_document(view.today).await {
        Ok(document) => DashboardEvent::Loaded(document),
        Err(err) => {
            tracing::error!("{READ_FAILED}: {err}");
            DashboardEvent::LoadFailed
        }
    };
    dispatch(view, event);
}
