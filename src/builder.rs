use std::sync::Arc;

use crate::ingredients::matcher::threshold_in_range;
use crate::ingredients::{
    IngredientMatcher, IngredientParser, NaturalLanguageParser, RecipeDiff, SimilarityScorer,
};
use crate::model::RecipeDiffResult;
use crate::PantryError;

/// Builder for configuring and running a single recipe diff
#[derive(Debug, Default)]
pub struct RecipeDiffBuilder {
    ingredients: Vec<String>,
    title: Option<String>,
    url: Option<String>,
    pantry_names: Option<Vec<String>>,
    threshold: Option<f64>,
    search_template: Option<String>,
    parser: Option<IngredientParser>,
    matcher: Option<IngredientMatcher>,
}

impl RecipeDiffBuilder {
    /// Set the recipe's ingredient lines, replacing any added before
    ///
    /// # Example
    /// ```
    /// use pantry_tracker::RecipeChecker;
    ///
    /// let builder = RecipeChecker::builder()
    ///     .ingredients(["2 cups basmati rice", "3 cloves garlic"]);
    /// ```
    pub fn ingredients<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.ingredients = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Append one ingredient line
    pub fn ingredient(mut self, line: impl Into<String>) -> Self {
        self.ingredients.push(line.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the pantry snapshot to compare against
    ///
    /// This is required. Pass an empty list to treat every ingredient as missing.
    ///
    /// # Example
    /// ```
    /// use pantry_tracker::{PantryStore, RecipeChecker};
    ///
    /// let store = PantryStore::in_memory();
    /// let builder = RecipeChecker::builder()
    ///     .ingredient("1 lime")
    ///     .pantry_names(store.names());
    /// ```
    pub fn pantry_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.pantry_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the minimum fuzzy score (0-100, inclusive) accepted as a match
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the purchase link template; `{query}` is replaced by the ingredient name
    pub fn search_template(mut self, template: impl Into<String>) -> Self {
        self.search_template = Some(template.into());
        self
    }

    /// Use a custom natural-language backend for ingredient lines
    pub fn parser_backend(mut self, backend: Arc<dyn NaturalLanguageParser>) -> Self {
        self.parser = Some(IngredientParser::new(backend));
        self
    }

    /// Skip tokenizing entirely; every line becomes a bare lowercased name
    pub fn without_parser_backend(mut self) -> Self {
        self.parser = Some(IngredientParser::without_backend());
        self
    }

    /// Use a custom similarity scorer for fuzzy matching
    pub fn scorer(mut self, scorer: Arc<dyn SimilarityScorer>) -> Self {
        self.matcher = Some(IngredientMatcher::new(scorer));
        self
    }

    /// Run the diff
    ///
    /// # Errors
    /// Returns `PantryError::BuilderError` if:
    /// - No pantry snapshot was given
    /// - The threshold is outside 0-100
    ///
    /// # Example
    /// ```
    /// use pantry_tracker::RecipeChecker;
    ///
    /// let result = RecipeChecker::builder()
    ///     .ingredients(["3 cloves garlic", "1 lb chicken breast"])
    ///     .pantry_names(["garlic", "olive oil"])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(result.in_pantry_count, 1);
    /// assert_eq!(result.missing_count, 1);
    /// ```
    pub fn build(self) -> Result<RecipeDiffResult, PantryError> {
        let pantry_names = self.pantry_names.ok_or_else(|| {
            PantryError::BuilderError(
                "No pantry snapshot specified. Use .pantry_names()".to_string(),
            )
        })?;

        let mut matcher = self.matcher.unwrap_or_default();
        if let Some(threshold) = self.threshold {
            if !threshold_in_range(threshold) {
                return Err(PantryError::BuilderError(format!(
                    "Threshold must be between 0 and 100, got {}",
                    threshold
                )));
            }
            matcher = matcher.with_threshold(threshold);
        }

        let mut differ = RecipeDiff::new(self.parser.unwrap_or_default(), matcher);
        if let Some(template) = self.search_template {
            differ = differ.with_search_template(template);
        }

        Ok(differ.diff(&self.ingredients, &pantry_names, self.title, self.url))
    }
}

/// Main entry point for the builder API
pub struct RecipeChecker;

impl RecipeChecker {
    /// Creates a new builder for diffing a recipe against a pantry
    ///
    /// # Example
    /// ```
    /// use pantry_tracker::RecipeChecker;
    ///
    /// let builder = RecipeChecker::builder();
    /// ```
    pub fn builder() -> RecipeDiffBuilder {
        RecipeDiffBuilder::default()
    }
}
