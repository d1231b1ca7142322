//! Deterministic keyword-scoring classifier used when inference fails

use scrivener_domain::CategorySet;

/// Endings accepted after a keyword (`bug` matches `bugs`, `budgeting`)
const SUFFIXES: [&str; 6] = ["s", "es", "ed", "ing", "er", "ers"];

/// Keywords shorter than this match exactly only (`hi` must not match `his`)
const MIN_STEM_LEN: usize = 3;

/// Scores notes against the keyword lists of a whitelist
///
/// The result is a pure function of the text, the whitelist and the
/// configured thresholds.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    categories: CategorySet,
    min_score: usize,
    max_tags: usize,
}

impl KeywordClassifier {
    /// Create a classifier over `categories`
    pub fn new(categories: CategorySet, min_score: usize, max_tags: usize) -> Self {
        Self {
            categories,
            min_score: min_score.max(1),
            max_tags,
        }
    }

    /// Keyword hits per category, in whitelist order
    pub fn scores(&self, title: &str, content: &str) -> Vec<(String, usize)> {
        let tokens = tokenize(&format!("{} {}", title, content));
        self.categories
            .iter()
            .map(|category| {
                let score = category
                    .keywords
                    .iter()
                    .map(|keyword| count_phrase(&tokens, keyword))
                    .sum();
                (category.name.clone(), score)
            })
            .collect()
    }

    /// Pick tags: highest score first, whitelist order on ties
    pub fn classify(&self, title: &str, content: &str) -> Vec<String> {
        let mut scored: Vec<(usize, String, usize)> = self
            .scores(title, content)
            .into_iter()
            .enumerate()
            .filter(|(_, (_, score))| *score >= self.min_score)
            .map(|(position, (name, score))| (position, name, score))
            .collect();

        scored.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        scored
            .into_iter()
            .take(self.max_tags)
            .map(|(_, name, _)| name)
            .collect()
    }
}

/// Lowercase alphanumeric words
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Occurrences of a (possibly multi-word) keyword as consecutive tokens
fn count_phrase(tokens: &[String], keyword: &str) -> usize {
    let parts = tokenize(keyword);
    let Some((last, leading)) = parts.split_last() else {
        return 0;
    };
    if tokens.len() < parts.len() {
        return 0;
    }

    tokens
        .windows(parts.len())
        .filter(|window| {
            let (window_last, window_leading) = match window.split_last() {
                Some(split) => split,
                None => return false,
            };
            window_leading == leading && token_matches(window_last, last)
        })
        .count()
}

fn token_matches(token: &str, keyword: &str) -> bool {
    if token == keyword {
        return true;
    }
    if keyword.chars().count() < MIN_STEM_LEN {
        return false;
    }
    token
        .strip_prefix(keyword)
        .is_some_and(|rest| SUFFIXES.contains(&rest))
}
