//! Answer classification and quality scoring
//!
//! A response is graded on two axes: an accuracy tier (exact / fuzzy /
//! partial / none) and a latency penalty. The combined 1-5 quality score is
//! the sole answer-derived input to the interval engine. Correctness for
//! score and streak bookkeeping uses only the equality predicate; partial
//! credit affects spacing, not streaks.

/// Accuracy tier of a response, first match wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Fuzzy,
    Partial,
    None,
}

impl MatchTier {
    fn accuracy(self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::Fuzzy => 0.7,
            Self::Partial => 0.4,
            Self::None => 0.0,
        }
    }
}

fn normalized_eq(user_input: &str, expected: &str) -> bool {
    user_input.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Case- and whitespace-insensitive full-string equality
pub fn exact_match(user_input: &str, expected: &str) -> bool {
    normalized_eq(user_input, expected)
}

/// Currently the same predicate as [`exact_match`]; kept as a separate tier
/// so a looser comparison can slot in without touching the scoring pipeline.
pub fn fuzzy_match(user_input: &str, expected: &str) -> bool {
    normalized_eq(user_input, expected)
}

/// Any whitespace-delimited token of the expected answer appears as a
/// substring of the input
pub fn partial_match(user_input: &str, expected: &str) -> bool {
    let input = user_input.trim().to_lowercase();
    expected
        .trim()
        .to_lowercase()
        .split_whitespace()
        .any(|keyword| input.contains(keyword))
}

/// Classify a response into its accuracy tier
pub fn classify(user_input: &str, expected: &str) -> MatchTier {
    if exact_match(user_input, expected) {
        MatchTier::Exact
    } else if fuzzy_match(user_input, expected) {
        MatchTier::Fuzzy
    } else if partial_match(user_input, expected) {
        MatchTier::Partial
    } else {
        MatchTier::None
    }
}

/// Whether a response counts as correct for score and streak purposes
pub fn is_correct(user_input: &str, expected: &str) -> bool {
    fuzzy_match(user_input, expected)
}

/// Combine accuracy tier and response latency into a 1-5 quality score.
///
/// The floor of 1 guarantees the interval engine always receives a valid
/// scale value, even for an empty response. Rounding is half-up
/// (`f64::round`), so an exact answer at 1s of a 5s limit scores 5.
pub fn score(user_input: &str, expected: &str, elapsed_seconds: f64, time_limit: f64) -> i32 {
    const PENALTY_RATE: f64 = 0.5;

    let accuracy = classify(user_input, expected).accuracy();
    let time_ratio = elapsed_seconds / time_limit.max(0.1);
    let time_penalty = (1.0 - time_ratio * PENALTY_RATE).max(0.5);

    ((accuracy * time_penalty * 5.0).round() as i32).max(1)
}
