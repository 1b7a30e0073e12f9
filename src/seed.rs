use crate::models::{
    Badge, DailyTargets, Document, KeyGoal, Milestone, MilestoneStatus, UserProfile,
};
use serde_json::Map;

pub const DEFAULT_PROFILE_NAME: &str = "Web Developer";

const MONK_MODE_CURRICULUM: &str = include_str!("../seed/monk_mode_curriculum.json");
const DAILY_SCHEDULE: &str = include_str!("../seed/daily_schedule.json");
const HEALTH_CHECKLIST: &str = include_str!("../seed/health_checklist.json");
const ANTI_DISTRACTION_SYSTEM: &str = include_str!("../seed/anti_distraction_system.json");
const MONK_MODE_FLASHCARDS: &str = include_str!("../seed/monk_mode_flashcards.json");

/// Builds the document written the first time the store is found empty.
pub fn initial_document(profile_name: &str, start_date: &str) -> Result<Document, serde_json::Error> {
    Ok(Document {
        user_profile: UserProfile {
            name: profile_name.to_string(),
            start_date: start_date.to_string(),
            ..UserProfile::default()
        },
        daily_targets: DailyTargets::default(),
        daily_logs: Vec::new(),
        motivational_quotes: motivational_quotes(),
        achievement_badges: achievement_badges(),
        monthly_milestones: monthly_milestones(),
        monk_mode_curriculum: serde_json::from_str(MONK_MODE_CURRICULUM)?,
        daily_schedule: serde_json::from_str(DAILY_SCHEDULE)?,
        health_checklist: serde_json::from_str(HEALTH_CHECKLIST)?,
        anti_distraction_system: serde_json::from_str(ANTI_DISTRACTION_SYSTEM)?,
        monk_mode_flashcards: serde_json::from_str(MONK_MODE_FLASHCARDS)?,
        extra: Map::new(),
    })
}

pub fn motivational_quotes() -> Vec<String> {
    [
        "Discipline is choosing between what you want now and what you want most.",
        "Deep work is the superpower of the 21st century.",
        "You do not rise to the level of your goals, you fall to the level of your systems.",
        "The phone can wait. Your future cannot.",
        "Small daily improvements are the key to staggering long-term results.",
        "Focus is a muscle. Train it every day.",
        "Sleep is not a luxury, it is part of the work.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Badge order is significant: achievement rules address badges by position.
pub fn achievement_badges() -> Vec<Badge> {
    vec![
        badge("Early Riser", "Log deep work on 7 consecutive days", "🌅"),
        badge("Deep Work Master", "Reach 3+ hours of deep work 7 days in a row", "🎯"),
        badge("Phone Detox", "Keep screen time at or under 1 hour for 14 logged days", "📱"),
    ]
}

fn badge(name: &str, description: &str, icon: &str) -> Badge {
    Badge {
        name: name.to_string(),
        description: description.to_string(),
        earned: false,
        icon: icon.to_string(),
        extra: Map::new(),
    }
}

pub fn monthly_milestones() -> Vec<Milestone> {
    vec![
        Milestone {
            month: 1,
            title: "Foundation".to_string(),
            status: MilestoneStatus::InProgress,
            completion_rate: 0.0,
            color: "#1FB8CD".to_string(),
            key_goals: vec![
                goal("Build a 3 hour daily deep work habit"),
                goal("Cut phone screen time to 1 hour"),
                goal("Finish the HTML/CSS/JavaScript refresher"),
            ],
            extra: Map::new(),
        },
        Milestone {
            month: 2,
            title: "Deep Focus".to_string(),
            status: MilestoneStatus::NotStarted,
            completion_rate: 0.0,
            color: "#FFC185".to_string(),
            key_goals: vec![
                goal("Ship two portfolio projects"),
                goal("Exercise 5 times per week"),
                goal("Meditate 10 minutes every day"),
            ],
            extra: Map::new(),
        },
        Milestone {
            month: 3,
            title: "Mastery".to_string(),
            status: MilestoneStatus::NotStarted,
            completion_rate: 0.0,
            color: "#B4413C".to_string(),
            key_goals: vec![
                goal("Contribute to an open source project"),
                goal("Sleep 8 hours on a fixed schedule"),
                goal("Apply to five developer roles"),
            ],
            extra: Map::new(),
        },
    ]
}

fn goal(text: &str) -> KeyGoal {
    KeyGoal {
        goal: text.to_string(),
        progress: 0.0,
        completed: false,
        extra: Map::new(),
    }
}
