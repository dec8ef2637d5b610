//! Validity predicates: which discovered files are worth expanding.

use classdeps_core::config::TreeConfig;
use std::path::Path;

/// Caller-supplied rule over a candidate dependency's file path.
pub trait DependencyFilter: Send + Sync {
    fn accepts(&self, path: &Path) -> bool;
}

impl<F> DependencyFilter for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn accepts(&self, path: &Path) -> bool {
        self(path)
    }
}

/// The built-in naming-convention rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRule {
    /// Every resolved file is expanded.
    Any,
    /// The path ends with one of these strings, e.g. `Business.cs`.
    Suffixes(Vec<String>),
    /// The path contains one of these keywords as a whole word.
    Keywords(Vec<String>),
}

impl PathRule {
    /// Keywords when any are selected, otherwise the suffix rule.
    pub fn from_config(config: &TreeConfig) -> Self {
        if config.keywords.is_empty() {
            Self::Suffixes(config.suffixes.clone())
        } else {
            Self::keywords(&config.keywords)
        }
    }

    pub fn keywords<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self::Keywords(
            keywords
                .iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }
}

impl DependencyFilter for PathRule {
    fn accepts(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        match self {
            Self::Any => true,
            Self::Suffixes(suffixes) => suffixes.iter().any(|s| path.ends_with(s.as_str())),
            Self::Keywords(keywords) => {
                let words = path_words(&path);
                keywords.iter().any(|k| contains_word(&words, k))
            }
        }
    }
}

/// Split a path into lowercase words at separators and camelCase humps.
///
/// `src/Business/OrderBusiness.cs` → `[src, business, order, business, cs]`,
/// `HTTPClientFactory` → `[http, client, factory]`.
pub fn path_words(path: &str) -> Vec<String> {
    let mut words = Vec::new();
    for segment in path.split(|c: char| !c.is_alphanumeric()) {
        let chars: Vec<char> = segment.chars().collect();
        let mut current = String::new();
        for (i, &c) in chars.iter().enumerate() {
            let boundary = i > 0
                && c.is_uppercase()
                && (chars[i - 1].is_lowercase()
                    || chars[i - 1].is_ascii_digit()
                    || (chars[i - 1].is_uppercase()
                        && chars.get(i + 1).is_some_and(|n| n.is_lowercase())));
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(c.to_lowercase());
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

/// Whether `keyword` equals one word, or a run of adjacent words joined
/// (so `valueobject` matches `OrderValueObject`).
fn contains_word(words: &[String], keyword: &str) -> bool {
    for start in 0..words.len() {
        let mut joined = String::new();
        for word in &words[start..] {
            joined.push_str(word);
            if joined == keyword {
                return true;
            }
            if joined.len() >= keyword.len() || !keyword.starts_with(joined.as_str()) {
                break;
            }
        }
    }
    false
}
