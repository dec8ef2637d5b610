//! Fuzzy supplementary matching on file names.
//!
//! Names are normalized by stripping the extension and architectural
//! stop-words, then scored with an order-insensitive token-set ratio (0–100).
//! This lets `LimiteTaxaController.cs` find `LimiteTaxaBusiness.cs` through
//! the shared domain token even when no code references connect them.

use classdeps_core::config::MatchingConfig;
use classdeps_core::model::FileEntry;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// A candidate that scored at or above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMatch {
    #[serde(rename = "match")]
    pub entry: FileEntry,
    pub score: f64,
}

/// Normalized indel similarity of two strings, 0–100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    2.0 * lcs_len(&a, &b) as f64 / total as f64 * 100.0
}

/// Longest common subsequence length, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Token-set similarity: compares the shared tokens against each side's
/// shared-plus-remaining tokens and keeps the best ratio.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let sect: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = sect.join(" ");
    let join = |diff: &[&str]| {
        if sect.is_empty() {
            diff.join(" ")
        } else {
            format!("{} {}", sect, diff.join(" "))
        }
    };
    let combined_ab = join(&diff_ab);
    let combined_ba = join(&diff_ba);

    let mut best = ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_ab))
            .max(ratio(&sect, &combined_ba));
    }
    best
}

/// Stop-word removal and threshold/limit settings for file-name matching.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    stop_words: Option<Regex>,
    threshold: f64,
    limit: usize,
}

impl NameMatcher {
    pub fn new<S: AsRef<str>>(stop_words: &[S], threshold: f64, limit: usize) -> Self {
        let mut words: Vec<String> = stop_words
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        // Longest first so "authorization" is removed whole rather than as "auth" + rest.
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.dedup();

        let stop_words = if words.is_empty() {
            None
        } else {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!("(?i)(?:{})", alternation)).ok()
        };
        Self {
            stop_words,
            threshold,
            limit,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(&config.stop_words, config.threshold, config.limit)
    }

    /// `LimiteTaxaController.cs` → `LimiteTaxa`, `user-controller-service.py` → `user`.
    pub fn clean_name(&self, file_name: &str) -> String {
        static EXT_RE: OnceLock<Regex> = OnceLock::new();
        static SEP_RE: OnceLock<Regex> = OnceLock::new();
        let ext_re = EXT_RE.get_or_init(|| Regex::new(r"\.\w+$").unwrap());
        let sep_re = SEP_RE.get_or_init(|| Regex::new(r"[-_.\s]+").unwrap());

        let name = ext_re.replace(file_name, "");
        let name = match &self.stop_words {
            Some(re) => re.replace_all(&name, "").into_owned(),
            None => name.into_owned(),
        };
        sep_re.replace_all(&name, " ").trim().to_string()
    }

    /// Rank `candidates` by similarity of their file names to `query`.
    ///
    /// Comparison is case-insensitive. Ties keep candidate order.
    pub fn find_similar(&self, query: &str, candidates: &[FileEntry]) -> Vec<SimilarMatch> {
        let query = query.to_lowercase();
        let mut matches: Vec<SimilarMatch> = candidates
            .iter()
            .filter_map(|entry| {
                let score = token_set_ratio(&query, &entry.file_name.to_lowercase());
                (score >= self.threshold).then(|| SimilarMatch {
                    entry: entry.clone(),
                    score,
                })
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.limit);
        matches
    }

    /// Clean `file_name`, then rank candidates against the cleaned name.
    pub fn matches_for(&self, file_name: &str, candidates: &[FileEntry]) -> Vec<SimilarMatch> {
        let query = self.clean_name(file_name);
        if query.is_empty() {
            return Vec::new();
        }
        self.find_similar(&query, candidates)
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}
