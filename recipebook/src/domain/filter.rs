//! Pure projections used by the recipe feed.
//!
//! The feed never mutates the snapshot; it recomputes the visible list from
//! the latest snapshot and the two independent filter inputs.

use super::{CategoryFilter, Recipe};

/// Case-insensitive substring test against the recipe title.
///
/// An empty query matches every title.
pub fn title_contains(title: &str, query: &str) -> bool {
    query.is_empty() || title.to_lowercase().contains(&query.to_lowercase())
}

/// Recipes whose title contains `query`, in snapshot order.
pub fn filter_by_query(recipes: &[Recipe], query: &str) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|recipe| title_contains(&recipe.title, query))
        .cloned()
        .collect()
}

/// Recipes accepted by the category selection, in snapshot order.
pub fn filter_by_category(recipes: &[Recipe], category: &CategoryFilter) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|recipe| category.matches(&recipe.category))
        .cloned()
        .collect()
}

/// Both feed filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Free-text title query.
    pub query: String,
    /// Selected category chip.
    pub category: CategoryFilter,
}

impl RecipeFilter {
    /// Whether a single recipe passes both predicates.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.category.matches(&recipe.category) && title_contains(&recipe.title, &self.query)
    }

    /// Project the visible list from a snapshot.
    ///
    /// # Examples
    /// ```
    /// use recipebook::domain::{CategoryFilter, Recipe, RecipeFilter};
    ///
    /// let snapshot = vec![
    ///     Recipe { title: "Lentil Soup".into(), category: "Soup".into(), ..Recipe::default() },
    ///     Recipe { title: "Lemon Cake".into(), category: "Dessert".into(), ..Recipe::default() },
    /// ];
    /// let filter = RecipeFilter { query: "le".into(), category: CategoryFilter::from_label("Soup") };
    /// let visible = filter.apply(&snapshot);
    /// assert_eq!(visible.len(), 1);
    /// assert_eq!(visible[0].title, "Lentil Soup");
    /// ```
    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        recipes
            .iter()
            .filter(|recipe| self.matches(recipe))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    fn recipe(id: &str, title: &str, category: &str) -> Recipe {
        Recipe {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            ..Recipe::default()
        }
    }

    #[fixture]
    fn snapshot() -> Vec<Recipe> {
        vec![
            recipe("1", "Shakshuka", "Breakfast"),
            recipe("2", "Green Shakshuka", "Vegan"),
            recipe("3", "Mansaf", "Middle Eastern"),
            recipe("4", "Pad Thai", "Thai"),
            recipe("5", "Thai Green Curry", "Thai"),
        ]
    }

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|recipe| recipe.id.as_str()).collect()
    }

    #[rstest]
    #[case("", "All", vec!["1", "2", "3", "4", "5"])]
    #[case("SHAK", "All", vec!["1", "2"])]
    #[case("green", "Thai", vec!["5"])]
    #[case("", "Thai", vec!["4", "5"])]
    #[case("mansaf", "Thai", vec![])]
    #[case("curry", "thai", vec![])]
    fn apply_combines_both_predicates(
        snapshot: Vec<Recipe>,
        #[case] query: &str,
        #[case] category: &str,
        #[case] expected: Vec<&str>,
    ) {
        let filter = RecipeFilter {
            query: query.into(),
            category: CategoryFilter::from_label(category),
        };
        assert_eq!(ids(&filter.apply(&snapshot)), expected);
    }

    #[rstest]
    #[case("", "All")]
    #[case("a", "Thai")]
    #[case("green", "Vegan")]
    #[case("x", "Breakfast")]
    #[case("sh", "Middle Eastern")]
    fn visible_is_intersection_of_single_filters(
        snapshot: Vec<Recipe>,
        #[case] query: &str,
        #[case] category: &str,
    ) {
        let category = CategoryFilter::from_label(category);
        let by_query = filter_by_query(&snapshot, query);
        let by_category = filter_by_category(&snapshot, &category);
        let intersection: Vec<Recipe> = by_query
            .iter()
            .filter(|recipe| by_category.contains(recipe))
            .cloned()
            .collect();
        let chained = filter_by_query(&filter_by_category(&snapshot, &category), query);

        let filter = RecipeFilter {
            query: query.into(),
            category,
        };
        let visible = filter.apply(&snapshot);
        assert_eq!(visible, intersection);
        assert_eq!(visible, chained);
    }
}
