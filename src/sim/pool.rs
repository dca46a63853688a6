//! Candidate pool
//!
//! Holds the answerable items for a session and hands out shuffled samples.
//! The pool itself is never reordered; sampling works on a copy.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::Limit;

/// Why a session could not be set up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("candidate pool is empty")]
    EmptyPool,
    #[error("duplicate candidate name: {0}")]
    DuplicateName(String),
    #[error("candidate with an empty name")]
    EmptyName,
}

/// One answerable item (term + clue)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique key, also the text printed on the tile
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// Text shown as the clue
    pub clue_text: String,
    /// Text read aloud instead of the clue, when present
    #[serde(default)]
    pub narration_text: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub reference_url: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, clue_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            clue_text: clue_text.into(),
            narration_text: None,
            categories: Vec::new(),
            reference_url: None,
        }
    }

    /// Text handed to the narrator (falls back to the clue)
    pub fn narration(&self) -> &str {
        self.narration_text.as_deref().unwrap_or(&self.clue_text)
    }

    /// Name with its alias in full-width parentheses, as listed on the result screen
    pub fn display_name(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{}（{}）", self.name, alias),
            None => self.name.clone(),
        }
    }
}

/// The full set of candidates a session can draw from
#[derive(Debug, Clone)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    /// Validate and wrap a candidate list
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, SetupError> {
        if candidates.is_empty() {
            return Err(SetupError::EmptyPool);
        }

        let mut seen = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if candidate.name.trim().is_empty() {
                return Err(SetupError::EmptyName);
            }
            if !seen.insert(candidate.name.as_str()) {
                return Err(SetupError::DuplicateName(candidate.name.clone()));
            }
        }

        Ok(Self { candidates })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Shuffled sample of `count` candidates
    pub fn sample<R: Rng + ?Sized>(&self, count: Limit, rng: &mut R) -> Vec<Candidate> {
        sample(&self.candidates, count, rng)
    }
}

/// Return a uniformly shuffled prefix of `all`
///
/// `count` is clamped to `all.len()`; `Limit::Unlimited` takes everything.
/// The shuffle is a full Fisher-Yates pass over a copy, so every permutation
/// is equally likely and `all` is left untouched.
pub fn sample<R: Rng + ?Sized>(all: &[Candidate], count: Limit, rng: &mut R) -> Vec<Candidate> {
    let take = count.clamp_to(all.len());
    let mut shuffled = all.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(take);
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pool_of(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(format!("card-{i}"), format!("clue {i}")))
            .collect()
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert_eq!(
            CandidatePool::new(Vec::new()).unwrap_err(),
            SetupError::EmptyPool
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut cards = pool_of(3);
        cards.push(Candidate::new("card-1", "again"));
        assert_eq!(
            CandidatePool::new(cards).unwrap_err(),
            SetupError::DuplicateName("card-1".to_string())
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let cards = vec![Candidate::new("  ", "clue")];
        assert_eq!(
            CandidatePool::new(cards).unwrap_err(),
            SetupError::EmptyName
        );
    }

    #[test]
    fn test_sample_clamps_and_leaves_source_alone() {
        let all = pool_of(5);
        let before = all.clone();
        let mut rng = Pcg32::seed_from_u64(7);

        assert_eq!(sample(&all, Limit::Limited(3), &mut rng).len(), 3);
        assert_eq!(sample(&all, Limit::Limited(50), &mut rng).len(), 5);
        assert_eq!(sample(&all, Limit::Unlimited, &mut rng).len(), 5);
        assert_eq!(all, before);
    }

    #[test]
    fn test_sample_has_no_repeats() {
        let all = pool_of(20);
        let mut rng = Pcg32::seed_from_u64(42);
        let picked = sample(&all, Limit::Limited(20), &mut rng);
        let names: HashSet<_> = picked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 20);
    }

    #[test]
    fn test_shuffle_is_roughly_uniform() {
        // Each card should land in each slot about trials / n times
        let n = 4;
        let trials = 8000;
        let all = pool_of(n);
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut counts = vec![vec![0u32; n]; n];

        for _ in 0..trials {
            let shuffled = sample(&all, Limit::Unlimited, &mut rng);
            for (pos, card) in shuffled.iter().enumerate() {
                let idx: usize = card.name["card-".len()..].parse().unwrap();
                counts[idx][pos] += 1;
            }
        }

        let expected = trials as f64 / n as f64;
        for row in &counts {
            for &c in row {
                let deviation = (c as f64 - expected).abs() / expected;
                assert!(deviation < 0.1, "slot count {c} too far from {expected}");
            }
        }
    }

    #[test]
    fn test_narration_falls_back_to_clue() {
        let mut card = Candidate::new("Daily Scrum", "15 minute sync");
        assert_eq!(card.narration(), "15 minute sync");
        card.narration_text = Some("fifteen minute sync".to_string());
        assert_eq!(card.narration(), "fifteen minute sync");
    }

    #[test]
    fn test_display_name_with_alias() {
        let mut card = Candidate::new("Retrospective", "look back");
        assert_eq!(card.display_name(), "Retrospective");
        card.alias = Some("Retro".to_string());
        assert_eq!(card.display_name(), "Retrospective（Retro）");
    }

    proptest! {
        #[test]
        fn prop_sample_length_is_min(pool in 1usize..40, count in 0u32..60) {
            let all = pool_of(pool);
            let mut rng = Pcg32::seed_from_u64(pool as u64 * 31 + count as u64);
            let picked = sample(&all, Limit::Limited(count), &mut rng);
            prop_assert_eq!(picked.len(), (count as usize).min(pool));
        }
    }
}
