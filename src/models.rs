use crate::seed;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The single persisted aggregate. Sections the server never interprets are
/// carried through verbatim, including top-level keys it does not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub user_profile: UserProfile,
    #[serde(default)]
    pub daily_targets: DailyTargets,
    #[serde(default)]
    pub daily_logs: Vec<DailyLog>,
    #[serde(default = "seed::motivational_quotes")]
    pub motivational_quotes: Vec<String>,
    #[serde(default = "seed::achievement_badges")]
    pub achievement_badges: Vec<Badge>,
    #[serde(default = "seed::monthly_milestones")]
    pub monthly_milestones: Vec<Milestone>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub monk_mode_curriculum: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub daily_schedule: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub health_checklist: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub anti_distraction_system: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub monk_mode_flashcards: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub start_date: String,
    pub current_month: u32,
    pub days_completed: usize,
    pub streak_count: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: seed::DEFAULT_PROFILE_NAME.to_string(),
            start_date: String::new(),
            current_month: 1,
            days_completed: 0,
            streak_count: 0,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub deep_work_hours: f64,
    pub phone_screen_time: f64,
    pub exercise_sessions_per_week: u32,
    pub sleep_hours: f64,
    pub meditation_minutes: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DailyTargets {
    fn default() -> Self {
        Self {
            deep_work_hours: 3.0,
            phone_screen_time: 1.0,
            exercise_sessions_per_week: 5,
            sleep_hours: 8.0,
            meditation_minutes: 10,
            extra: Map::new(),
        }
    }
}

/// One day's metrics. `date` is the natural key and is compared as a plain
/// string. Other fields are not validated: `null` or a missing value becomes
/// the zero value, numbers and booleans sent as strings are read the way the
/// dashboard form sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub deep_work_hours: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub phone_screen_time: f64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub exercise_done: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exercise_type: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sleep_hours: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sleep_quality: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub mood_score: f64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub meditation_done: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("number {number} is out of range"))),
        Value::String(raw) if raw.trim().is_empty() => Ok(0.0),
        Value::String(raw) => raw
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got \"{raw}\""))),
        other => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(flag) => Ok(flag),
        Value::String(raw) if raw == "true" => Ok(true),
        Value::String(raw) if raw == "false" || raw.is_empty() => Ok(false),
        other => Err(de::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(de::Error::custom(format!("expected text, got {other}"))),
    }
}

impl DailyLog {
    /// Neutral stand-in for a day with no stored log.
    pub fn placeholder(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            deep_work_hours: 0.0,
            phone_screen_time: 0.0,
            exercise_done: false,
            exercise_type: String::new(),
            sleep_hours: 0.0,
            sleep_quality: 0.0,
            mood_score: 5.0,
            meditation_done: false,
            notes: String::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub earned: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authored status. Values other than the three known ones are kept as
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    NotStarted,
    InProgress,
    Completed,
    #[serde(untagged)]
    Other(String),
}

impl MilestoneStatus {
    pub fn label(&self) -> &str {
        match self {
            MilestoneStatus::NotStarted => "Not started",
            MilestoneStatus::InProgress => "In progress",
            MilestoneStatus::Completed => "Completed",
            MilestoneStatus::Other(raw) => raw,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            MilestoneStatus::NotStarted | MilestoneStatus::Other(_) => "info",
            MilestoneStatus::InProgress => "warning",
            MilestoneStatus::Completed => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub month: u32,
    pub title: String,
    pub status: MilestoneStatus,
    pub completion_rate: f64,
    pub color: String,
    #[serde(default)]
    pub key_goals: Vec<KeyGoal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyGoal {
    pub goal: String,
    pub progress: f64,
    pub completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct SaveLogResponse {
    pub message: String,
    pub data: Document,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WeeklySummary {
    pub days: usize,
    pub avg_deep_work_hours: f64,
    pub avg_phone_screen_time: f64,
    pub avg_sleep_hours: f64,
    pub avg_mood_score: f64,
    pub exercise_days: usize,
    pub meditation_days: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MetricProgress {
    pub value: f64,
    pub target: f64,
    /// `value / target`, clamped to `0..=1` for drawing.
    pub ratio: f64,
    pub over_target: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TodayMetrics {
    pub date: String,
    pub logged: bool,
    pub deep_work: MetricProgress,
    pub screen_time: MetricProgress,
    pub exercise_done: bool,
    pub exercise_type: String,
    pub sleep_hours: f64,
    pub sleep_quality: f64,
    pub meditation_done: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub days_counted: u8,
    pub avg_deep_work_hours: f64,
    pub avg_sleep_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub reference_date: String,
    pub days: Vec<DailyLog>,
    pub summary: WeeklySummary,
    pub today: TodayMetrics,
    pub current_streak: usize,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
}
