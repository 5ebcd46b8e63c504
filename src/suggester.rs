use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::{HistoricalRecord, MatchResult, Table};

pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.3;

// Candidate header names, tried in order, compared case-insensitively.
const NOTES_COLUMNS: &[&str] = &["notes", "note", "memo"];
const DETAILS_COLUMNS: &[&str] = &["details", "details / [to]", "payee"];
const CATEGORY_COLUMNS: &[&str] = &["category", "categories"];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// A best score must be strictly above this to produce a suggestion.
    pub threshold: f64,
    /// Score containment of one description in the other as a perfect match.
    pub substring_match: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            substring_match: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestion {
    pub details: String,
    pub category: String,
}

impl Suggestion {
    pub fn is_empty(&self) -> bool {
        self.details.is_empty() && self.category.is_empty()
    }
}

/// A description prepared for comparison.
struct Prepared {
    text: String,
    tokens: HashSet<String>,
}

impl Prepared {
    fn new(raw: &str) -> Self {
        let text = raw.trim().to_lowercase();
        let tokens = WORD.find_iter(&text).map(|m| m.as_str().to_string()).collect();
        Self { text, tokens }
    }
}

fn score(a: &Prepared, b: &Prepared, config: &MatchConfig) -> f64 {
    if a.text.is_empty() || b.text.is_empty() {
        return 0.0;
    }
    if config.substring_match && (a.text.contains(&b.text) || b.text.contains(&a.text)) {
        return 1.0;
    }
    if a.tokens.is_empty() || b.tokens.is_empty() {
        return 0.0;
    }
    let shared = a.tokens.intersection(&b.tokens).count();
    let union = a.tokens.union(&b.tokens).count();
    shared as f64 / union as f64
}

/// Similarity of two descriptions in [0, 1].
#[allow(dead_code)]
pub fn similarity(a: &str, b: &str, config: &MatchConfig) -> f64 {
    score(&Prepared::new(a), &Prepared::new(b), config)
}

/// Past (notes, details, category) triples, scanned linearly per query.
pub struct SuggestionIndex {
    records: Vec<HistoricalRecord>,
    prepared: Vec<Prepared>,
    config: MatchConfig,
}

impl SuggestionIndex {
    pub fn empty(config: MatchConfig) -> Self {
        Self {
            records: Vec::new(),
            prepared: Vec::new(),
            config,
        }
    }

    pub fn from_records(records: Vec<HistoricalRecord>, config: MatchConfig) -> Self {
        let records: Vec<HistoricalRecord> = records
            .into_iter()
            .filter(|r| {
                let notes = r.notes.trim();
                !notes.is_empty() && !notes.eq_ignore_ascii_case("notes")
            })
            .collect();
        let prepared = records.iter().map(|r| Prepared::new(&r.notes)).collect();
        Self {
            records,
            prepared,
            config,
        }
    }

    /// Build from a previously categorized ledger. If the Notes, Details and
    /// Category columns cannot all be found the index is empty.
    pub fn build(table: &Table, config: MatchConfig) -> Self {
        let (Some(notes), Some(details), Some(category)) = (
            table.find_column(NOTES_COLUMNS),
            table.find_column(DETAILS_COLUMNS),
            table.find_column(CATEGORY_COLUMNS),
        ) else {
            warn!(
                columns = %table.columns.join(", "),
                "historical file lacks Notes/Details/Category columns, suggestions disabled"
            );
            return Self::empty(config);
        };

        let records = table
            .rows
            .iter()
            .map(|row| HistoricalRecord {
                notes: row[notes].as_text(),
                details: row[details].as_text(),
                category: row[category].as_text(),
            })
            .collect();
        let index = Self::from_records(records, config);
        debug!(records = index.len(), "suggestion index built");
        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[allow(dead_code)]
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Highest-scoring record. Ties go to the earliest record.
    pub fn best_match(&self, description: &str) -> MatchResult {
        let query = Prepared::new(description);
        let mut best = MatchResult::none();
        for (idx, candidate) in self.prepared.iter().enumerate() {
            let s = score(&query, candidate, &self.config);
            if s > best.score {
                best = MatchResult {
                    score: s,
                    index: Some(idx),
                };
                if s >= 1.0 {
                    break;
                }
            }
        }
        best
    }

    pub fn suggest(&self, description: &str) -> Suggestion {
        let result = self.best_match(description);
        match result.index {
            Some(idx) if result.score > self.config.threshold => {
                let record = &self.records[idx];
                Suggestion {
                    details: record.details.clone(),
                    category: record.category.clone(),
                }
            }
            _ => Suggestion::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Row};
    use crate::tabulator::tabulate;

    fn record(notes: &str, details: &str, category: &str) -> HistoricalRecord {
        HistoricalRecord {
            notes: notes.to_string(),
            details: details.to_string(),
            category: category.to_string(),
        }
    }

    fn index(records: Vec<HistoricalRecord>) -> SuggestionIndex {
        SuggestionIndex::from_records(records, MatchConfig::default())
    }

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn test_substring_scores_one() {
        let config = MatchConfig::default();
        assert_eq!(similarity("AMAZON MKTPLACE PMTS 12345", "amazon mktplace pmts", &config), 1.0);
        assert_eq!(similarity("  netflix ", "NETFLIX.COM", &config), 1.0);
    }

    #[test]
    fn test_jaccard_over_word_sets() {
        let config = MatchConfig::default();
        assert_eq!(similarity("TESCO STORES 1234", "TESCO STORES 9999", &config), 0.5);
        assert_eq!(similarity("COFFEE SHOP", "GROCERY STORE", &config), 0.0);
    }

    #[test]
    fn test_substring_shortcut_can_be_disabled() {
        let config = MatchConfig {
            substring_match: false,
            ..MatchConfig::default()
        };
        assert_eq!(similarity("AMAZON PMTS 12345", "AMAZON PMTS", &config), 2.0 / 3.0);
    }

    #[test]
    fn test_empty_description_never_matches() {
        let config = MatchConfig::default();
        assert_eq!(similarity("", "ANYTHING", &config), 0.0);
        assert_eq!(similarity("   ", "ANYTHING", &config), 0.0);
        assert_eq!(similarity("--", "**", &config), 0.0);
    }

    #[test]
    fn test_scenario_substring_suggestion() {
        let idx = index(vec![record("AMAZON MKTPLACE PMTS", "Amazon", "Shopping")]);
        let result = idx.best_match("AMAZON MKTPLACE PMTS 12345");
        assert_eq!(result.score, 1.0);
        assert_eq!(result.index, Some(0));
        assert_eq!(
            idx.suggest("AMAZON MKTPLACE PMTS 12345"),
            Suggestion {
                details: "Amazon".into(),
                category: "Shopping".into()
            }
        );
    }

    #[test]
    fn test_scenario_disjoint_words_no_suggestion() {
        let idx = index(vec![record("GROCERY STORE", "Grocer", "Food")]);
        assert_eq!(idx.best_match("COFFEE SHOP").score, 0.0);
        assert_eq!(idx.suggest("COFFEE SHOP"), Suggestion::default());
    }

    #[test]
    fn test_substring_beats_closer_word_overlap() {
        let idx = index(vec![
            record("SHELL OIL 9999 LONDON", "Shell", "Fuel"),
            record("OIL 4411", "Oil Co", "Heating"),
        ]);
        let result = idx.best_match("SHELL OIL 4411 LONDON");
        assert_eq!(result.index, Some(1));
        assert_eq!(idx.suggest("SHELL OIL 4411 LONDON").category, "Heating");
    }

    #[test]
    fn test_ties_keep_first_record() {
        let idx = index(vec![
            record("UBER TRIP", "Uber", "Travel"),
            record("UBER EATS", "Uber Eats", "Food"),
        ]);
        let result = idx.best_match("UBER HELP");
        assert_eq!(result.index, Some(0));
        assert_eq!(idx.suggest("UBER HELP").details, "Uber");
    }

    #[test]
    fn test_single_shared_word_below_threshold() {
        let idx = index(vec![record("SHOP RITE STORES", "ShopRite", "Groceries")]);
        assert_eq!(idx.best_match("COFFEE SHOP").score, 0.25);
        assert!(idx.suggest("COFFEE SHOP").is_empty());
    }

    #[test]
    fn test_score_equal_to_threshold_is_rejected() {
        let records = vec![record("alpha beta gamma five six seven", "Greek", "Letters")];
        let query = "alpha beta gamma one two three four";
        let idx = index(records.clone());
        assert_eq!(idx.best_match(query).score, 0.3);
        assert!(idx.suggest(query).is_empty());

        let looser = SuggestionIndex::from_records(
            records,
            MatchConfig {
                threshold: 0.25,
                ..MatchConfig::default()
            },
        );
        assert_eq!(looser.suggest(query).category, "Letters");
    }

    #[test]
    fn test_empty_index_returns_blank() {
        let idx = SuggestionIndex::empty(MatchConfig::default());
        assert_eq!(idx.best_match("ANYTHING"), MatchResult::none());
        assert_eq!(idx.suggest("ANYTHING"), Suggestion::default());
    }

    #[test]
    fn test_filters_blank_and_header_notes() {
        let idx = index(vec![
            record("", "Blank", "X"),
            record("Notes", "Details", "Category"),
            record("RENT", "Landlord", "Housing"),
        ]);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.records()[0].notes, "RENT");
        assert!(idx.suggest("Notes").is_empty());
    }

    #[test]
    fn test_build_from_table_with_aliases() {
        let grid = vec![
            row(&["Date", "Details / [To]", "CATEGORY", "notes", "Amount"]),
            row(&["01/01/2024", "Netflix", "Subscriptions", "NETFLIX.COM", "-9.99"]),
            row(&["02/01/2024", "", "", "ATM WITHDRAWAL", "-20"]),
        ];
        let idx = SuggestionIndex::build(&tabulate(&grid, 0), MatchConfig::default());
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.suggest("NETFLIX.COM 8822").details, "Netflix");
        assert_eq!(idx.suggest("ATM WITHDRAWAL 12/01"), Suggestion::default());
    }

    #[test]
    fn test_build_without_required_columns_is_empty() {
        let grid = vec![
            row(&["Date", "Notes", "Amount"]),
            row(&["01/01/2024", "NETFLIX.COM", "-9.99"]),
        ];
        let idx = SuggestionIndex::build(&tabulate(&grid, 0), MatchConfig::default());
        assert!(idx.is_empty());
        assert!(idx.suggest("NETFLIX.COM").is_empty());
    }
}
