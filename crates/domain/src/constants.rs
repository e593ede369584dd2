//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! scheduling engine.

// Slot enumeration
pub const SLOT_STEP_MINUTES: i64 = 30;
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

// Session parameter bounds
pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 480;

// Scoring deltas (see solver component table)
pub const MORNING_BONUS: f64 = 20.0;
pub const AFTERNOON_BONUS: f64 = 10.0;
pub const ADJACENCY_PENALTY: f64 = 5.0;
pub const ADJACENCY_WINDOW_MINUTES: i64 = 30;
pub const EARLY_WINDOW_MAX_BONUS: i64 = 7;
pub const WORKING_HOURS_BONUS: f64 = 15.0;
pub const WORKING_HOURS_PENALTY: f64 = 10.0;
pub const BUFFER_BONUS: f64 = 10.0;
pub const BUFFER_PENALTY: f64 = 5.0;
pub const DAILY_CUTOFF_PENALTY: f64 = 20.0;
pub const VIP_AFTER_HOURS_BONUS: f64 = 10.0;
pub const VIP_WEIGHT_MULTIPLIER: f64 = 10.0;

// Solver selection thresholds (inclusive boundaries stay local)
pub const REMOTE_PARTICIPANT_THRESHOLD: usize = 3;
pub const REMOTE_CONSTRAINT_THRESHOLD: usize = 5;
pub const REMOTE_SOLVER_TIMEOUT_SECS: u64 = 30;

// Hold lifecycle
pub const DEFAULT_HOLD_TIMEOUT_HOURS: i64 = 24;
pub const MIN_HOLD_TIMEOUT_MINUTES: i64 = 5;
pub const MIN_HOLD_EXTENSION_HOURS: i64 = 1;
pub const MAX_HOLD_EXTENSION_HOURS: i64 = 72;
pub const APPROACHING_EXPIRY_THRESHOLD_MINUTES: i64 = 60;
pub const HOLD_TITLE_PREFIX: &str = "[HOLD]";
pub const DEFAULT_TARGET_CALENDAR: &str = "primary";

// Extended property keys stamped onto placeholder events
pub const MANAGED_PROPERTY_KEY: &str = "tminus_managed";
pub const HOLD_ID_PROPERTY_KEY: &str = "tminus_hold_id";
pub const SESSION_ID_PROPERTY_KEY: &str = "tminus_session_id";
