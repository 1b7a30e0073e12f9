use crate::models::{Badge, DailyLog};

const EARLY_RISER: usize = 0;
const DEEP_WORK_MASTER: usize = 1;
const PHONE_DETOX: usize = 2;

const WEEK: usize = 7;
const DETOX_DAYS: usize = 14;

/// Latches every badge whose rule holds and returns the indices that flipped
/// during this call. `last_week` is the gap-filled seven day window; `logs` is
/// the raw stored sequence. A badge is never set back to unearned.
pub fn evaluate(badges: &mut [Badge], last_week: &[DailyLog], logs: &[DailyLog]) -> Vec<usize> {
    let rules: [(usize, bool); 3] = [
        (EARLY_RISER, early_riser(last_week)),
        (DEEP_WORK_MASTER, deep_work_master(last_week)),
        (PHONE_DETOX, phone_detox(logs)),
    ];

    let mut newly_earned = Vec::new();
    for (index, passed) in rules {
        let Some(badge) = badges.get_mut(index) else {
            continue;
        };
        if passed && !badge.earned {
            badge.earned = true;
            newly_earned.push(index);
        }
    }
    newly_earned
}

fn early_riser(last_week: &[DailyLog]) -> bool {
    last_week.len() >= WEEK && last_week.iter().all(|log| log.deep_work_hours > 0.0)
}

fn deep_work_master(last_week: &[DailyLog]) -> bool {
    last_week.len() >= WEEK && last_week.iter().all(|log| log.deep_work_hours >= 3.0)
}

fn phone_detox(logs: &[DailyLog]) -> bool {
    logs.len() >= DETOX_DAYS
        && logs[logs.len() - DETOX_DAYS..]
            .iter()
            .all(|log| log.phone_screen_time <= 1.0)
}

pub fn unlocked_message(badge: &Badge) -> String {
    if badge.icon.is_empty() {
        format!("{} badge unlocked!", badge.name)
    } else {
        format!("{} {} badge unlocked!", badge.icon, badge.name)
    }
}
