//! Fairness and VIP re-scoring helpers
//!
//! Pure, side-effect-free functions layered atop solver output. Fairness is
//! scoped to the participants of one session: a participant whose preference
//! lost recent negotiations earns a multiplicative boost so the same people
//! do not win every time. All helpers return neutral adjustments (factor
//! 1.0, no explanation) when there is no relevant data.

use chrono::{DateTime, Utc};
use tminus_domain::{SchedulingHistoryEntry, VipPolicy};

/// Boost applied per deficit point, capped at [`MAX_FAIRNESS_DEFICIT`]
const FAIRNESS_STEP: f64 = 0.05;
const MAX_FAIRNESS_DEFICIT: i64 = 5;

/// A multiplicative score adjustment with an optional audit fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreAdjustment {
    pub factor: f64,
    pub explanation: Option<String>,
}

impl ScoreAdjustment {
    pub fn neutral() -> Self {
        Self { factor: 1.0, explanation: None }
    }
}

/// Inputs to the combined score; `constraint_score` is reserved for future
/// use and currently folded into the solver's own score rather than
/// double-counted here.
#[derive(Debug, Clone, Copy)]
pub struct MultiFactorInputs {
    pub time_preference_score: f64,
    pub constraint_score: f64,
    pub fairness_adjustment: f64,
    pub vip_weight: f64,
}

/// Compute a fairness adjustment for one participant from the history ledger.
///
/// The deficit is the number of sessions where the participant was involved
/// but someone else's preference won, minus the sessions they won themselves,
/// clamped to `0..=MAX_FAIRNESS_DEFICIT`. No history means a neutral 1.0.
pub fn compute_fairness_score(
    history: &[SchedulingHistoryEntry],
    target_participant: &str,
) -> ScoreAdjustment {
    let involved: Vec<_> =
        history.iter().filter(|e| e.participant_hash == target_participant).collect();
    if involved.is_empty() {
        return ScoreAdjustment::neutral();
    }

    let losses = involved.iter().filter(|e| e.preferred_hash != target_participant).count() as i64;
    let wins = involved.len() as i64 - losses;
    let deficit = (losses - wins).clamp(0, MAX_FAIRNESS_DEFICIT);
    if deficit == 0 {
        return ScoreAdjustment::neutral();
    }

    let factor = 1.0 + FAIRNESS_STEP * deficit as f64;
    ScoreAdjustment {
        factor,
        explanation: Some(format!(
            "fairness boost after {deficit} deprioritized session(s) (x{factor:.2})"
        )),
    }
}

/// Derive a multiplicative weight from the highest-priority matching VIP
/// policy, or neutral 1.0 when none of the participants is a VIP.
pub fn apply_vip_weight(policies: &[VipPolicy], participant_hashes: &[String]) -> ScoreAdjustment {
    let best = policies
        .iter()
        .filter(|p| participant_hashes.contains(&p.participant_hash))
        .fold(None::<&VipPolicy>, |best, current| match best {
            Some(b) if b.priority_weight >= current.priority_weight => Some(b),
            _ => Some(current),
        });

    match best {
        Some(policy) => {
            let factor = 1.0 + policy.priority_weight / 10.0;
            ScoreAdjustment {
                factor,
                explanation: Some(format!(
                    "VIP weighting for {} (x{factor:.2})",
                    policy.display_name
                )),
            }
        }
        None => ScoreAdjustment::neutral(),
    }
}

/// Combine the solver's raw score with the fairness and VIP adjustments.
pub fn compute_multi_factor_score(inputs: &MultiFactorInputs) -> f64 {
    let _ = inputs.constraint_score;
    inputs.time_preference_score * inputs.fairness_adjustment * inputs.vip_weight
}

/// Concatenate the base solver explanation with fairness/VIP fragments for
/// audit and debugging.
pub fn build_explanation(base: &str, fairness: Option<&str>, vip: Option<&str>) -> String {
    let mut parts = Vec::with_capacity(3);
    if !base.is_empty() {
        parts.push(base);
    }
    if let Some(fragment) = fairness {
        parts.push(fragment);
    }
    if let Some(fragment) = vip {
        parts.push(fragment);
    }
    parts.join("; ")
}

/// Produce ledger entries recording who won this negotiation, one per
/// participant. Persisted by the orchestrator and consumed by future
/// fairness computations.
pub fn record_scheduling_outcome(
    session_id: &str,
    participant_hashes: &[String],
    preferred_hash: &str,
    chosen_start: DateTime<Utc>,
    recorded_at: DateTime<Utc>,
) -> Vec<SchedulingHistoryEntry> {
    participant_hashes
        .iter()
        .map(|hash| SchedulingHistoryEntry {
            session_id: session_id.to_string(),
            participant_hash: hash.clone(),
            preferred_hash: preferred_hash.to_string(),
            chosen_start,
            recorded_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(session: &str, participant: &str, preferred: &str) -> SchedulingHistoryEntry {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().unwrap();
        SchedulingHistoryEntry {
            session_id: session.to_string(),
            participant_hash: participant.to_string(),
            preferred_hash: preferred.to_string(),
            chosen_start: at,
            recorded_at: at,
        }
    }

    fn policy(hash: &str, weight: f64) -> VipPolicy {
        VipPolicy {
            participant_hash: hash.to_string(),
            display_name: format!("VIP {hash}"),
            priority_weight: weight,
            allow_after_hours: false,
        }
    }

    #[test]
    fn no_history_is_neutral() {
        assert_eq!(compute_fairness_score(&[], "p1"), ScoreAdjustment::neutral());
    }

    #[test]
    fn deprioritized_participant_earns_boost() {
        let history = vec![
            entry("s1", "p1", "p2"),
            entry("s2", "p1", "p2"),
            entry("s3", "p1", "p1"),
        ];
        let adjustment = compute_fairness_score(&history, "p1");
        assert!(adjustment.factor > 1.0);
        assert!(adjustment.explanation.is_some());
    }

    #[test]
    fn consistent_winner_stays_neutral() {
        let history = vec![entry("s1", "p1", "p1"), entry("s2", "p1", "p1")];
        assert_eq!(compute_fairness_score(&history, "p1"), ScoreAdjustment::neutral());
    }

    #[test]
    fn fairness_boost_is_capped() {
        let history: Vec<_> = (0..20).map(|i| entry(&format!("s{i}"), "p1", "p2")).collect();
        let adjustment = compute_fairness_score(&history, "p1");
        assert_eq!(adjustment.factor, 1.0 + FAIRNESS_STEP * MAX_FAIRNESS_DEFICIT as f64);
    }

    #[test]
    fn vip_weight_is_neutral_without_match() {
        let policies = vec![policy("vip-1", 2.0)];
        let adjustment = apply_vip_weight(&policies, &["p1".to_string()]);
        assert_eq!(adjustment, ScoreAdjustment::neutral());
    }

    #[test]
    fn vip_weight_is_monotonic_in_priority() {
        let hashes = vec!["vip-1".to_string()];
        let low = apply_vip_weight(&[policy("vip-1", 1.0)], &hashes);
        let high = apply_vip_weight(&[policy("vip-1", 3.0)], &hashes);
        assert!(high.factor > low.factor);
        assert!(low.factor > 1.0);
    }

    #[test]
    fn highest_priority_policy_wins() {
        let hashes = vec!["vip-1".to_string(), "vip-2".to_string()];
        let adjustment =
            apply_vip_weight(&[policy("vip-1", 1.0), policy("vip-2", 4.0)], &hashes);
        assert!((adjustment.factor - 1.4).abs() < 1e-9);
        assert!(adjustment.explanation.unwrap().contains("vip-2"));
    }

    #[test]
    fn multi_factor_score_multiplies_adjustments() {
        let score = compute_multi_factor_score(&MultiFactorInputs {
            time_preference_score: 40.0,
            constraint_score: 99.0,
            fairness_adjustment: 1.1,
            vip_weight: 1.2,
        });
        assert!((score - 52.8).abs() < 1e-9);
    }

    #[test]
    fn explanation_concatenates_present_fragments() {
        let explanation =
            build_explanation("morning slot (+20)", Some("fairness boost (x1.10)"), None);
        assert_eq!(explanation, "morning slot (+20); fairness boost (x1.10)");
    }

    #[test]
    fn outcome_produces_one_entry_per_participant() {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().unwrap();
        let entries = record_scheduling_outcome(
            "s1",
            &["p1".to_string(), "p2".to_string()],
            "p1",
            at,
            at,
        );
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.preferred_hash == "p1" && e.session_id == "s1"));
    }
}
