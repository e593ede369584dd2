//! Constraint-aware slot solver
//!
//! Enumerates candidate slots aligned to a fixed 30-minute step across the
//! requested window, drops hard-excluded slots, scores the survivors, and
//! returns them ordered by score descending with start-time-ascending
//! tie-break. The ordering is stable and reproducible for identical inputs.
//!
//! Complexity is O(slots x (busy + constraints)); a one-week window at
//! 30-minute granularity is ~336 slots.

pub mod scoring;
pub mod strategy;

use chrono::{DateTime, Duration, Utc};
use tminus_domain::constants::SLOT_STEP_MINUTES;
use tminus_domain::{ScoredCandidate, SolverConstraint, SolverInput};

/// Solve the given input, returning at most `max_candidates` scored slots.
pub fn solve(input: &SolverInput, max_candidates: usize) -> Vec<ScoredCandidate> {
    let step = Duration::minutes(SLOT_STEP_MINUTES);
    let duration = Duration::minutes(input.duration_minutes);

    let mut candidates = Vec::new();
    let mut slot_start = input.window_start;
    while slot_start + duration <= input.window_end {
        let slot_end = slot_start + duration;
        if !is_hard_excluded(input, slot_start, slot_end) {
            let (score, explanation) = scoring::score_slot(input, slot_start, slot_end);
            candidates.push(ScoredCandidate::new(slot_start, slot_end, score, explanation));
        }
        slot_start += step;
    }

    sort_candidates(&mut candidates);
    candidates.truncate(max_candidates);
    candidates
}

/// Stable sort by score descending, ties broken by start time ascending.
pub fn sort_candidates(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.start.cmp(&b.start))
    });
}

/// A slot is hard-excluded when it overlaps a busy interval covering a
/// required account, a trip window, or a manual unavailable override. Trips
/// and overrides are absolute exclusions regardless of busy-interval
/// coverage, which protects against missing sync data.
fn is_hard_excluded(input: &SolverInput, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let busy_blocked = input
        .busy_intervals
        .iter()
        .any(|b| b.overlaps(start, end) && b.covers_any_account(&input.required_account_ids));
    if busy_blocked {
        return true;
    }

    input.constraints.iter().any(|constraint| match constraint {
        SolverConstraint::Trip { start: trip_start, end: trip_end } => {
            *trip_start < end && start < *trip_end
        }
        SolverConstraint::Override { start: o_start, end: o_end, available: false } => {
            *o_start < end && start < *o_end
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tminus_domain::BusyInterval;

    use super::*;

    fn ts(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, h, m, 0).single().unwrap()
    }

    fn base_input() -> SolverInput {
        SolverInput {
            window_start: ts(2, 8, 0),
            window_end: ts(6, 18, 0),
            duration_minutes: 60,
            busy_intervals: Vec::new(),
            required_account_ids: vec!["acct-1".to_string()],
            constraints: Vec::new(),
            participant_hashes: Vec::new(),
        }
    }

    #[test]
    fn busy_overlap_for_required_account_excludes_slot() {
        let mut input = base_input();
        input.busy_intervals.push(BusyInterval {
            start: ts(2, 9, 0),
            end: ts(2, 9, 30),
            account_ids: vec!["acct-1".to_string()],
        });

        let candidates = solve(&input, 100);
        assert!(candidates.iter().all(|c| c.start != ts(2, 9, 0)));
        // 08:30 overlaps the busy half hour as well
        assert!(candidates.iter().all(|c| c.start != ts(2, 8, 30)));

        let morning = candidates.iter().find(|c| c.start == ts(2, 8, 0)).unwrap();
        assert!(morning.explanation.contains("morning"));
    }

    #[test]
    fn busy_interval_for_other_account_does_not_exclude() {
        let mut input = base_input();
        input.busy_intervals.push(BusyInterval {
            start: ts(2, 9, 0),
            end: ts(2, 9, 30),
            account_ids: vec!["someone-else".to_string()],
        });

        let candidates = solve(&input, 500);
        assert!(candidates.iter().any(|c| c.start == ts(2, 9, 0)));
    }

    #[test]
    fn trip_windows_are_absolute_exclusions() {
        let mut input = base_input();
        input
            .constraints
            .push(SolverConstraint::Trip { start: ts(3, 0, 0), end: ts(4, 0, 0) });

        let candidates = solve(&input, 500);
        assert!(candidates.iter().all(|c| c.end <= ts(3, 0, 0) || c.start >= ts(4, 0, 0)));
    }

    #[test]
    fn unavailable_override_excludes_its_window() {
        let mut input = base_input();
        input.constraints.push(SolverConstraint::Override {
            start: ts(2, 10, 0),
            end: ts(2, 12, 0),
            available: false,
        });

        let candidates = solve(&input, 500);
        assert!(candidates.iter().all(|c| c.end <= ts(2, 10, 0) || c.start >= ts(2, 12, 0)));
    }

    #[test]
    fn solver_is_deterministic() {
        let mut input = base_input();
        input.busy_intervals.push(BusyInterval {
            start: ts(2, 13, 0),
            end: ts(2, 14, 0),
            account_ids: vec!["acct-1".to_string()],
        });

        let first = solve(&input, 5);
        let second = solve(&input, 5);
        let starts_a: Vec<_> = first.iter().map(|c| (c.start, c.score)).collect();
        let starts_b: Vec<_> = second.iter().map(|c| (c.start, c.score)).collect();
        assert_eq!(starts_a, starts_b);
    }

    #[test]
    fn ordering_invariant_holds() {
        let input = base_input();
        let candidates = solve(&input, 50);
        for pair in candidates.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.score > b.score || (a.score == b.score && a.start <= b.start),
                "ordering violated: ({}, {}) before ({}, {})",
                a.score,
                a.start,
                b.score,
                b.start
            );
        }
    }

    #[test]
    fn results_are_truncated_to_max_candidates() {
        let input = base_input();
        assert_eq!(solve(&input, 5).len(), 5);
        assert_eq!(solve(&input, 3).len(), 3);
    }

    #[test]
    fn zero_duration_window_yields_no_candidates() {
        let mut input = base_input();
        input.window_end = input.window_start;
        assert!(solve(&input, 5).is_empty());
    }
}
