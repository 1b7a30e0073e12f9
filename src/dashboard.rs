//! Dashboard client state.
//!
//! Everything the page shows lives in [`DashboardState`]. UI events are
//! values of [`DashboardEvent`]; [`dispatch`] routes each one to a pure
//! handler that updates the state and returns the side effects the caller
//! has to run (currently only saving a log).

use crate::achievements::unlocked_message;
use crate::models::{DailyLog, Document};
use crate::stats::date_key;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Map;

pub const LOAD_FAILED: &str = "Could not load data from the server. Please try again.";
pub const SAVE_FAILED: &str = "Error: could not save data to the server.";
pub const SAVE_OK: &str = "✅ Today's log was saved successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Overview,
    Daily,
    Weekly,
    Milestones,
    Achievements,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Daily,
        Tab::Weekly,
        Tab::Milestones,
        Tab::Achievements,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Daily => "daily",
            Tab::Weekly => "weekly",
            Tab::Milestones => "milestones",
            Tab::Achievements => "achievements",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Daily => "Daily log",
            Tab::Weekly => "Weekly",
            Tab::Milestones => "Milestones",
            Tab::Achievements => "Achievements",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub today: NaiveDate,
    pub document: Option<Document>,
    pub active_tab: Tab,
    pub modal: Option<String>,
}

impl DashboardState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            document: None,
            active_tab: Tab::default(),
            modal: None,
        }
    }

    pub fn today_log(&self) -> Option<&DailyLog> {
        let key = date_key(self.today);
        self.document
            .as_ref()
            .and_then(|doc| doc.daily_logs.iter().find(|log| log.date == key))
    }
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    Loaded(Document),
    LoadFailed,
    SwitchTab(Tab),
    SubmitLog(DailyLog),
    Saved {
        document: Document,
        newly_earned: Vec<usize>,
    },
    SaveFailed,
    CloseModal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SaveLog(DailyLog),
}

pub fn dispatch(state: &mut DashboardState, event: DashboardEvent) -> Vec<Effect> {
    match event {
        DashboardEvent::Loaded(document) => on_loaded(state, document),
        DashboardEvent::LoadFailed => show_modal(state, LOAD_FAILED.to_string()),
        DashboardEvent::SwitchTab(tab) => on_switch_tab(state, tab),
        DashboardEvent::SubmitLog(log) => on_submit_log(state, log),
        DashboardEvent::Saved {
            document,
            newly_earned,
        } => on_saved(state, document, &newly_earned),
        DashboardEvent::SaveFailed => show_modal(state, SAVE_FAILED.to_string()),
        DashboardEvent::CloseModal => {
            state.modal = None;
            Vec::new()
        }
    }
}

fn on_loaded(state: &mut DashboardState, document: Document) -> Vec<Effect> {
    state.document = Some(document);
    Vec::new()
}

fn on_switch_tab(state: &mut DashboardState, tab: Tab) -> Vec<Effect> {
    state.active_tab = tab;
    Vec::new()
}

fn on_submit_log(state: &mut DashboardState, mut log: DailyLog) -> Vec<Effect> {
    if log.date.trim().is_empty() {
        log.date = date_key(state.today);
    }
    vec![Effect::SaveLog(log)]
}

/// The server's copy replaces the local document wholesale.
fn on_saved(state: &mut DashboardState, document: Document, newly_earned: &[usize]) -> Vec<Effect> {
    let mut lines = vec![SAVE_OK.to_string()];
    lines.extend(
        newly_earned
            .iter()
            .filter_map(|&index| document.achievement_badges.get(index))
            .map(unlocked_message),
    );
    state.document = Some(document);
    show_modal(state, lines.join("\n"))
}

fn show_modal(state: &mut DashboardState, message: String) -> Vec<Effect> {
    state.modal = Some(message);
    Vec::new()
}

/// Fields of the daily log form as the browser posts them. Numbers that are
/// blank or unparsable count as zero.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogForm {
    pub date: String,
    pub deep_work_hours: String,
    pub phone_screen_time: String,
    pub exercise_done: String,
    pub exercise_type: String,
    pub sleep_hours: String,
    pub sleep_quality: String,
    pub mood_score: String,
    pub meditation_done: String,
    pub notes: String,
}

impl LogForm {
    pub fn into_log(self) -> DailyLog {
        DailyLog {
            date: self.date.trim().to_string(),
            deep_work_hours: number(&self.deep_work_hours),
            phone_screen_time: number(&self.phone_screen_time),
            exercise_done: self.exercise_done == "true",
            exercise_type: self.exercise_type,
            sleep_hours: number(&self.sleep_hours),
            sleep_quality: number(&self.sleep_quality).trunc(),
            mood_score: number(&self.mood_score),
            meditation_done: self.meditation_done == "true",
            notes: self.notes,
            extra: Map::new(),
        }
    }
}

fn number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
