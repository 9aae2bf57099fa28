use log::debug;

use super::matcher::IngredientMatcher;
use super::parser::IngredientParser;
use crate::config::PantryConfig;
use crate::error::PantryError;
use crate::model::{IngredientStatus, RecipeDiffResult};
use crate::shopping::{search_url, WHOLE_FOODS_SEARCH};

/// Compares recipe ingredient lines against a pantry snapshot.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent diffs.
#[derive(Debug, Clone)]
pub struct RecipeDiff {
    parser: IngredientParser,
    matcher: IngredientMatcher,
    search_template: String,
}

impl Default for RecipeDiff {
    fn default() -> Self {
        Self::new(IngredientParser::default(), IngredientMatcher::default())
    }
}

impl RecipeDiff {
    pub fn new(parser: IngredientParser, matcher: IngredientMatcher) -> Self {
        Self {
            parser,
            matcher,
            search_template: WHOLE_FOODS_SEARCH.to_string(),
        }
    }

    /// Default parser and scorer with the configured threshold and link template.
    ///
    /// Fails with `ConfigError` when the threshold is outside 0-100.
    pub fn from_config(config: &PantryConfig) -> Result<Self, PantryError> {
        let threshold = config.matching.validated_threshold()?;
        Ok(Self::new(
            IngredientParser::default(),
            IngredientMatcher::default().with_threshold(threshold),
        )
        .with_search_template(config.shopping.search_url_template.clone()))
    }

    pub fn with_search_template(mut self, template: impl Into<String>) -> Self {
        self.search_template = template.into();
        self
    }

    pub fn parser(&self) -> &IngredientParser {
        &self.parser
    }

    pub fn matcher(&self) -> &IngredientMatcher {
        &self.matcher
    }

    /// Diff every line against `pantry_names`, preserving line order.
    ///
    /// Missing ingredients get a purchase link; owned ones don't.
    pub fn diff<L: AsRef<str>, S: AsRef<str>>(
        &self,
        lines: &[L],
        pantry_names: &[S],
        title: Option<String>,
        url: Option<String>,
    ) -> RecipeDiffResult {
        let ingredients: Vec<IngredientStatus> = lines
            .iter()
            .map(|line| self.status(line.as_ref(), pantry_names))
            .collect();

        let in_pantry_count = ingredients.iter().filter(|s| s.in_pantry).count();
        let missing_count = ingredients.len() - in_pantry_count;
        debug!(
            "Recipe diff: {} in pantry, {} missing",
            in_pantry_count, missing_count
        );

        RecipeDiffResult {
            title,
            url,
            ingredients,
            missing_count,
            in_pantry_count,
        }
    }

    fn status<S: AsRef<str>>(&self, line: &str, pantry_names: &[S]) -> IngredientStatus {
        let parsed = self.parser.parse(line);
        let matched = self.matcher.match_ingredient(&parsed.name, pantry_names);
        let link = (!matched.in_pantry).then(|| search_url(&self.search_template, &parsed.name));

        IngredientStatus {
            raw: line.to_string(),
            name: parsed.name,
            quantity: parsed.quantity,
            unit: parsed.unit,
            comment: parsed.comment,
            in_pantry: matched.in_pantry,
            pantry_match: matched.pantry_match,
            match_score: matched.score,
            search_url: link,
        }
    }
}

/// Diff a recipe with the default parser, scorer and link template
pub fn diff_recipe<L: AsRef<str>, S: AsRef<str>>(
    lines: &[L],
    pantry_names: &[S],
    title: Option<String>,
    url: Option<String>,
) -> RecipeDiffResult {
    RecipeDiff::default().diff(lines, pantry_names, title, url)
}
