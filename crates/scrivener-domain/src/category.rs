//! Category module - the whitelist of auto-assignable tags

use serde::{Deserialize, Serialize};

/// A whitelisted tag name with the keywords that indicate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Canonical tag name (e.g. "Finance")
    pub name: String,

    /// Lowercase keywords or phrases scored by the fallback classifier
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Category {
    /// Create a category from a name and keyword list
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// The ordered category whitelist
///
/// Declaration order is significant: it breaks ties between categories
/// with equal keyword scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(Vec<Category>);

impl CategorySet {
    /// Build a whitelist, rejecting empty or duplicate names
    ///
    /// # Errors
    /// Returns error if a name is blank or two names differ only by case
    pub fn new(categories: Vec<Category>) -> Result<Self, String> {
        for (i, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(format!("Category #{} has an empty name", i + 1));
            }
            if categories[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&category.name))
            {
                return Err(format!("Duplicate category '{}'", category.name));
            }
        }
        Ok(Self(categories))
    }

    /// Categories in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.iter()
    }

    /// Category names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the whitelist has no categories
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Map a name to its canonical spelling, ignoring case and surrounding
    /// whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_domain::CategorySet;
    ///
    /// let set = CategorySet::default();
    /// assert_eq!(set.canonical(" coding "), Some("Coding"));
    /// assert_eq!(set.canonical("Cooking"), None);
    /// ```
    pub fn canonical(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.0
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.name.as_str())
    }

    /// True when `name` is whitelisted with exactly this spelling
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c.name == name)
    }
}

impl Default for CategorySet {
    /// The stock whitelist: Greeting, Coding, Education, Finance
    fn default() -> Self {
        Self(vec![
            Category::new(
                "Greeting",
                [
                    "hello",
                    "hi",
                    "hey",
                    "greetings",
                    "welcome",
                    "nice to meet",
                    "good morning",
                ],
            ),
            Category::new(
                "Coding",
                [
                    "code",
                    "python",
                    "javascript",
                    "rust",
                    "programming",
                    "function",
                    "class",
                    "api",
                    "bug",
                    "compiler",
                ],
            ),
            Category::new(
                "Education",
                [
                    "learn",
                    "study",
                    "education",
                    "course",
                    "tutorial",
                    "lesson",
                    "homework",
                    "lecture",
                ],
            ),
            Category::new(
                "Finance",
                [
                    "money",
                    "budget",
                    "finance",
                    "investment",
                    "cost",
                    "price",
                    "bank",
                    "savings",
                    "expense",
                    "salary",
                ],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_whitelist_order() {
        let set = CategorySet::default();
        assert_eq!(set.names(), vec!["Greeting", "Coding", "Education", "Finance"]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_canonical_lookup() {
        let set = CategorySet::default();
        assert_eq!(set.canonical("FINANCE"), Some("Finance"));
        assert_eq!(set.canonical("greeting"), Some("Greeting"));
        assert_eq!(set.canonical("Fin"), None);
        assert!(set.contains("Coding"));
        assert!(!set.contains("coding"));
    }

    #[test]
    fn test_rejects_duplicates_and_blank_names() {
        let dup = CategorySet::new(vec![
            Category::new("Work", ["job"]),
            Category::new("work", ["office"]),
        ]);
        assert!(dup.is_err());

        let blank = CategorySet::new(vec![Category::new(" ", ["x"])]);
        assert!(blank.is_err());

        let ok = CategorySet::new(vec![Category::new("Work", ["job"])]).unwrap();
        assert_eq!(ok.names(), vec!["Work"]);
    }
}
