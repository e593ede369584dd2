//! Slot scoring components
//!
//! Each surviving slot is scored by summing independent components; every
//! contributing component appends a human-readable fragment carrying its
//! delta, in evaluation order. Hour-of-day boundaries are evaluated in UTC;
//! zone-specific preferences are expressed through working-hours and
//! daily-cutoff constraints, which are evaluated in their own IANA zone.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use tminus_domain::constants::{
    ADJACENCY_PENALTY, ADJACENCY_WINDOW_MINUTES, AFTERNOON_BONUS, BUFFER_BONUS, BUFFER_PENALTY,
    DAILY_CUTOFF_PENALTY, EARLY_WINDOW_MAX_BONUS, MORNING_BONUS, VIP_AFTER_HOURS_BONUS,
    VIP_WEIGHT_MULTIPLIER, WORKING_HOURS_BONUS, WORKING_HOURS_PENALTY,
};
use tminus_domain::{SolverConstraint, SolverInput};

/// Score one slot, returning the total and the comma-joined rationale.
pub(crate) fn score_slot(
    input: &SolverInput,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> (f64, String) {
    let mut score = 0.0;
    let mut parts: Vec<String> = Vec::new();

    // Time of day
    let hour = start.hour();
    if (8..12).contains(&hour) {
        add(&mut score, &mut parts, "morning slot", MORNING_BONUS);
    } else if (12..17).contains(&hour) {
        add(&mut score, &mut parts, "afternoon slot", AFTERNOON_BONUS);
    }

    // Adjacency to existing meetings
    let adjacent = input
        .busy_intervals
        .iter()
        .filter(|b| {
            (b.end <= start && (start - b.end).num_minutes() < ADJACENCY_WINDOW_MINUTES)
                || (b.start >= end && (b.start - end).num_minutes() < ADJACENCY_WINDOW_MINUTES)
        })
        .count();
    if adjacent > 0 {
        let label = if adjacent == 1 {
            "adjacent to 1 busy interval".to_string()
        } else {
            format!("adjacent to {adjacent} busy intervals")
        };
        add(&mut score, &mut parts, &label, -(ADJACENCY_PENALTY * adjacent as f64));
    }

    // Early-in-window preference
    let days_in = (start - input.window_start).num_days();
    let early_bonus = (EARLY_WINDOW_MAX_BONUS - days_in).max(0);
    if early_bonus > 0 {
        add(&mut score, &mut parts, "early in window", early_bonus as f64);
    }

    // Working hours, evaluated in each constraint's zone
    let mut applies_to_weekday = false;
    let mut covered = false;
    for constraint in &input.constraints {
        if let SolverConstraint::WorkingHours { days, start: wh_start, end: wh_end, timezone } =
            constraint
        {
            let tz = parse_tz(timezone);
            let local_start = start.with_timezone(&tz);
            let local_end = end.with_timezone(&tz);
            let weekday = local_start.weekday().num_days_from_monday() as u8;
            if !days.contains(&weekday) {
                continue;
            }
            applies_to_weekday = true;
            if local_start.date_naive() == local_end.date_naive()
                && local_start.time() >= *wh_start
                && local_end.time() <= *wh_end
            {
                covered = true;
            }
        }
    }
    let mut outside_working_hours = false;
    if covered {
        add(&mut score, &mut parts, "within working hours", WORKING_HOURS_BONUS);
    } else if applies_to_weekday {
        outside_working_hours = true;
        add(&mut score, &mut parts, "outside working hours", -WORKING_HOURS_PENALTY);
    }

    // Buffer adequacy: max required gap per direction across constraints
    let mut before_gap: i64 = 0;
    let mut after_gap: i64 = 0;
    let mut has_buffer = false;
    for constraint in &input.constraints {
        if let SolverConstraint::Buffer { buffer_type, minutes } = constraint {
            has_buffer = true;
            if buffer_type.applies_before() {
                before_gap = before_gap.max(*minutes);
            } else {
                after_gap = after_gap.max(*minutes);
            }
        }
    }
    if has_buffer {
        let violated = input.busy_intervals.iter().any(|b| {
            (b.end <= start && (start - b.end).num_minutes() < before_gap)
                || (b.start >= end && (b.start - end).num_minutes() < after_gap)
        });
        if violated {
            add(&mut score, &mut parts, "buffer violated", -BUFFER_PENALTY);
        } else {
            add(&mut score, &mut parts, "buffers respected", BUFFER_BONUS);
        }
    }

    // Daily cutoff
    let after_cutoff = input.constraints.iter().any(|constraint| {
        if let SolverConstraint::NoMeetingsAfter { time, timezone } = constraint {
            start.with_timezone(&parse_tz(timezone)).time() >= *time
        } else {
            false
        }
    });
    if after_cutoff {
        add(&mut score, &mut parts, "after daily cutoff", -DAILY_CUTOFF_PENALTY);
    }

    // VIP override: the highest-priority matching VIP drives both effects
    let best_vip = input
        .constraints
        .iter()
        .filter_map(|constraint| match constraint {
            SolverConstraint::VipOverride { participant_hash, priority_weight, allow_after_hours }
                if input.participant_hashes.contains(participant_hash) =>
            {
                Some((*priority_weight, *allow_after_hours))
            }
            _ => None,
        })
        .fold(None::<(f64, bool)>, |best, current| match best {
            Some(b) if b.0 >= current.0 => Some(b),
            _ => Some(current),
        });
    if let Some((weight, allow_after_hours)) = best_vip {
        if outside_working_hours && allow_after_hours {
            add(
                &mut score,
                &mut parts,
                "VIP override relaxes working hours",
                WORKING_HOURS_PENALTY + VIP_AFTER_HOURS_BONUS,
            );
        }
        let weight_bonus = (weight * VIP_WEIGHT_MULTIPLIER).round();
        if weight_bonus != 0.0 {
            add(&mut score, &mut parts, "VIP priority", weight_bonus);
        }
    }

    (score, parts.join(", "))
}

fn add(score: &mut f64, parts: &mut Vec<String>, label: &str, delta: f64) {
    *score += delta;
    let sign = if delta >= 0.0 { "+" } else { "-" };
    parts.push(format!("{label} ({sign}{})", delta.abs() as i64));
}

fn parse_tz(timezone: &str) -> Tz {
    timezone.parse::<Tz>().unwrap_or(chrono_tz::UTC)
}
