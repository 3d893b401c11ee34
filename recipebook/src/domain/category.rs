//! Recipe category vocabulary and the list filter built on it.

use std::fmt;

/// Closed category vocabulary offered by the recipe form, in display order.
///
/// Writes only require a non-blank category; the list is not enforced.
pub const CATEGORIES: [&str; 30] = [
    "Breakfast",
    "Lunch",
    "Dinner",
    "Dessert",
    "Snack",
    "Vegan",
    "Keto",
    "Appetizer",
    "Soup",
    "Salad",
    "Main Course",
    "Side Dish",
    "Beverage",
    "Bakery",
    "Italian",
    "Mexican",
    "Chinese",
    "Indian",
    "Japanese",
    "Thai",
    "Vietnamese",
    "Greek",
    "French",
    "Spanish",
    "Middle Eastern",
    "Lebanese",
    "Moroccan",
    "Egyptian",
    "Turkish",
    "Saudi",
];

/// Sentinel label meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Category chips shown above the feed: the sentinel followed by the vocabulary.
pub fn filter_labels() -> impl Iterator<Item = &'static str> {
    std::iter::once(ALL_CATEGORIES).chain(CATEGORIES)
}

/// Category selection for the recipe feed.
///
/// # Examples
/// ```
/// use recipebook::domain::CategoryFilter;
///
/// assert_eq!(CategoryFilter::from_label("All"), CategoryFilter::All);
/// assert!(CategoryFilter::from_label("Soup").matches("Soup"));
/// assert!(!CategoryFilter::from_label("Soup").matches("soup"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category passes.
    #[default]
    All,
    /// Only recipes whose category equals the label exactly.
    Only(String),
}

impl CategoryFilter {
    /// Interpret a chip label, mapping the sentinel to [`CategoryFilter::All`].
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        if label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(label)
        }
    }

    /// Exact-match predicate.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => label == category,
        }
    }

    /// Label shown for the selection.
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(label) => label.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn filter_labels_start_with_sentinel() {
        let labels: Vec<_> = filter_labels().collect();
        assert_eq!(labels.first(), Some(&ALL_CATEGORIES));
        assert_eq!(labels.len(), CATEGORIES.len() + 1);
    }

    #[rstest]
    #[case("All", "Dinner", true)]
    #[case("Dinner", "Dinner", true)]
    #[case("Dinner", "Lunch", false)]
    #[case("Dinner", "dinner", false)]
    fn matches_exactly(#[case] label: &str, #[case] category: &str, #[case] expected: bool) {
        assert_eq!(CategoryFilter::from_label(label).matches(category), expected);
    }

    #[rstest]
    fn label_round_trips() {
        assert_eq!(CategoryFilter::All.label(), "All");
        assert_eq!(CategoryFilter::from_label("Thai").to_string(), "Thai");
    }
}
