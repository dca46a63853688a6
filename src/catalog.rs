//! Candidate dataset loading
//!
//! The dataset is a JSON document of the form:
//!
//! ```json
//! { "practices": [
//!     { "name": "Daily Scrum", "alias": "DS", "description": "...",
//!       "reading": "...", "category": ["Scrum"], "url": "https://..." }
//! ] }
//! ```
//!
//! Only `name` and `description` are required.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::sim::{Candidate, CandidatePool, SetupError};

/// Why a dataset could not be loaded
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Setup(#[from] SetupError),
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    practices: Vec<DatasetEntry>,
}

#[derive(Debug, Deserialize)]
struct DatasetEntry {
    name: String,
    #[serde(default)]
    alias: Option<String>,
    description: String,
    #[serde(default)]
    reading: Option<String>,
    #[serde(default)]
    category: Vec<String>,
    #[serde(default)]
    url: Option<String>,
}

impl From<DatasetEntry> for Candidate {
    fn from(entry: DatasetEntry) -> Self {
        Candidate {
            name: entry.name,
            alias: entry.alias.filter(|a| !a.is_empty()),
            clue_text: entry.description,
            narration_text: entry.reading.filter(|r| !r.is_empty()),
            categories: entry.category,
            reference_url: entry.url.filter(|u| !u.is_empty()),
        }
    }
}

/// Parse a dataset document into a validated pool
pub fn parse_pool(json: &str) -> Result<CandidatePool, CatalogError> {
    let file: DatasetFile = serde_json::from_str(json)?;
    let candidates = file.practices.into_iter().map(Candidate::from).collect();
    Ok(CandidatePool::new(candidates)?)
}

/// Read and parse a dataset file
pub fn load_pool(path: &Path) -> Result<CandidatePool, CatalogError> {
    let json = std::fs::read_to_string(path)?;
    let pool = parse_pool(&json)?;
    log::info!("Loaded {} candidates from {}", pool.len(), path.display());
    Ok(pool)
}

/// Short label for a category badge (unknown categories are shown as-is)
pub fn category_short_name(category: &str) -> &str {
    match category {
        "スクラム" => "スクラム",
        "スクラム(補完)" => "補完",
        "XP" => "XP",
        "価値探索" => "価値探索",
        "チームビルディング" => "チーム",
        other => other,
    }
}

/// Style class for a category badge (empty for unknown categories)
pub fn category_style_class(category: &str) -> &'static str {
    match category {
        "スクラム" => "cat-scrum",
        "スクラム(補完)" => "cat-scrum-ext",
        "XP" => "cat-xp",
        "価値探索" => "cat-value",
        "チームビルディング" => "cat-team",
        _ => "",
    }
}

/// Small built-in dataset for demos and smoke runs
pub const SAMPLE_DATASET: &str = r#"{
  "practices": [
    { "name": "Daily Scrum", "description": "A 15-minute event for the developers to inspect progress toward the sprint goal.", "category": ["スクラム"] },
    { "name": "Sprint Review", "description": "The team presents results to stakeholders and the product backlog is adapted.", "category": ["スクラム"] },
    { "name": "Retrospective", "alias": "Retro", "description": "The team reflects on how the last sprint went and plans improvements.", "category": ["スクラム"] },
    { "name": "Product Backlog", "description": "An ordered list of everything that might be needed in the product.", "category": ["スクラム"] },
    { "name": "Definition of Done", "alias": "DoD", "description": "A shared checklist an increment must satisfy to be considered complete.", "category": ["スクラム"] },
    { "name": "Pair Programming", "description": "Two developers work together at one workstation, one driving and one navigating.", "category": ["XP"] },
    { "name": "Test-Driven Development", "alias": "TDD", "description": "Write a failing test first, make it pass, then refactor.", "reading": "Write a failing test first. Make it pass. Then refactor.", "category": ["XP"] },
    { "name": "Continuous Integration", "alias": "CI", "description": "Everyone merges to the mainline many times a day, each merge verified by an automated build.", "category": ["XP"] },
    { "name": "User Story", "description": "A short description of a feature told from the perspective of the person who wants it.", "category": ["価値探索"] },
    { "name": "Inception Deck", "description": "Ten questions a team answers together before starting a project.", "category": ["チームビルディング"] },
    { "name": "Working Agreement", "description": "Ground rules the team agrees on for how it works together.", "category": ["チームビルディング"] },
    { "name": "Planning Poker", "description": "Estimating by having everyone reveal a card at the same time.", "category": ["スクラム(補完)"] }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_sample_dataset() {
        let pool = parse_pool(SAMPLE_DATASET).unwrap();
        assert_eq!(pool.len(), 12);

        let tdd = pool
            .candidates()
            .iter()
            .find(|c| c.name == "Test-Driven Development")
            .unwrap();
        assert_eq!(tdd.alias.as_deref(), Some("TDD"));
        assert_eq!(
            tdd.narration(),
            "Write a failing test first. Make it pass. Then refactor."
        );
        assert_eq!(tdd.categories, vec!["XP".to_string()]);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "practices": [{ "name": "Kanban", "description": "Visualize work", "alias": "" }]
        }"#;
        let pool = parse_pool(json).unwrap();
        let card = &pool.candidates()[0];
        assert_eq!(card.alias, None);
        assert_eq!(card.narration(), "Visualize work");
        assert!(card.categories.is_empty());
        assert_eq!(card.reference_url, None);
    }

    #[test]
    fn test_empty_dataset_is_setup_error() {
        let err = parse_pool(r#"{"practices": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Setup(SetupError::EmptyPool)));

        let err = parse_pool("{}").unwrap_err();
        assert!(matches!(err, CatalogError::Setup(SetupError::EmptyPool)));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(parse_pool("not json"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_pool(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_DATASET.as_bytes()).unwrap();
        let pool = load_pool(file.path()).unwrap();
        assert_eq!(pool.len(), 12);
    }

    #[test]
    fn test_category_lookup_falls_back() {
        assert_eq!(category_short_name("チームビルディング"), "チーム");
        assert_eq!(category_style_class("XP"), "cat-xp");
        assert_eq!(category_short_name("Kanban"), "Kanban");
        assert_eq!(category_style_class("Kanban"), "");
    }
}
