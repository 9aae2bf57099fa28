//! Ingredient parsing, pantry matching and recipe diffing.

pub mod diff;
pub mod matcher;
pub mod parser;

pub use diff::{diff_recipe, RecipeDiff};
pub use matcher::{
    match_ingredient, match_many, token_set_ratio, IngredientMatcher, SimilarityScorer,
    TokenSetScorer, MATCH_THRESHOLD,
};
pub use parser::{
    parse, parse_many, parse_quantity, Amount, BoxError, IngredientParser, NaturalLanguageParser,
    RawIngredient, RuleBasedParser,
};
