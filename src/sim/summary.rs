//! End-of-session results

use serde::{Deserialize, Serialize};

use super::pool::Candidate;
use super::state::{Difficulty, Session};

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every question was resolved
    Cleared,
    /// The miss limit ended the run early
    Failed,
}

/// Result screen data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub difficulty: Difficulty,
    pub final_score: u64,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub accuracy_percent: u32,
    pub elapsed_seconds: u64,
    pub missed: Vec<Candidate>,
    pub outcome: Outcome,
}

impl Summary {
    pub fn cleared(&self) -> bool {
        self.outcome == Outcome::Cleared
    }

    /// Short verdict for the result screen
    pub fn message(&self) -> &'static str {
        result_message(self.accuracy_percent)
    }
}

/// Build the result summary for a session
///
/// Meant for a session in `Complete`; on a live session the elapsed time runs
/// up to the current session clock.
pub fn summarize(session: &Session) -> Summary {
    let correct = session.correct_count;
    let wrong = session.wrong_count;

    let start = session.started_at_ms.unwrap_or(0);
    let end = session.ended_at_ms.unwrap_or(session.clock_ms);
    let elapsed_seconds = end.saturating_sub(start) / 1000;

    let outcome = if session.current_index >= session.selected.len() {
        Outcome::Cleared
    } else {
        Outcome::Failed
    };

    Summary {
        difficulty: session.difficulty,
        final_score: session.score,
        correct_count: correct,
        wrong_count: wrong,
        accuracy_percent: accuracy_percent(correct, wrong),
        elapsed_seconds,
        missed: session.missed.clone(),
        outcome,
    }
}

/// Share of resolved questions answered correctly, rounded to a whole percent
pub fn accuracy_percent(correct: u32, wrong: u32) -> u32 {
    let answered = correct + wrong;
    if answered == 0 {
        return 0;
    }
    (100.0 * correct as f64 / answered as f64).round() as u32
}

/// Verdict text by accuracy band
pub fn result_message(accuracy: u32) -> &'static str {
    match accuracy {
        100.. => "Perfect! You are a true master!",
        80..=99 => "Excellent! Nearly flawless.",
        60..=79 => "Well done! Keep studying.",
        40..=59 => "Not bad. A little more practice!",
        _ => "Keep at it! Repetition is the key.",
    }
}

/// `"2m 5s"` or `"42s"`
pub fn format_elapsed(seconds: u64) -> String {
    let min = seconds / 60;
    let sec = seconds % 60;
    if min > 0 {
        format!("{min}m {sec}s")
    } else {
        format!("{sec}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy_percent(7, 3), 70);
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(2, 1), 67);
        assert_eq!(accuracy_percent(1, 2), 33);
        assert_eq!(accuracy_percent(5, 0), 100);
    }

    #[test]
    fn test_result_message_bands() {
        assert_eq!(result_message(100), "Perfect! You are a true master!");
        assert_eq!(result_message(80), "Excellent! Nearly flawless.");
        assert_eq!(result_message(79), "Well done! Keep studying.");
        assert_eq!(result_message(40), "Not bad. A little more practice!");
        assert_eq!(result_message(0), "Keep at it! Repetition is the key.");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(42), "42s");
        assert_eq!(format_elapsed(60), "1m 0s");
        assert_eq!(format_elapsed(125), "2m 5s");
    }
}
