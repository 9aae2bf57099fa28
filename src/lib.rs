//! Household pantry tracking: store groceries, parse recipe ingredient
//! lines, and find out what a recipe still needs.
//!
//! # Example
//! ```
//! use pantry_tracker::{diff_recipe, NewPantryItem, PantryStore};
//!
//! let mut store = PantryStore::in_memory();
//! store.create(NewPantryItem::named("Garlic")).unwrap();
//!
//! let result = diff_recipe(&["3 cloves garlic", "2 limes"], &store.names(), None, None);
//! assert_eq!(result.in_pantry_count, 1);
//! assert!(result.ingredients[1].search_url.is_some());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod ingredients;
pub mod model;
pub mod pantry;
pub mod pipelines;
pub mod shopping;
pub mod vision;

// Re-export builder API as primary interface
pub use builder::{RecipeChecker, RecipeDiffBuilder};

pub use config::{load_config, PantryConfig};
pub use error::PantryError;
pub use ingredients::{
    diff_recipe, match_ingredient, match_many, parse, parse_many, IngredientMatcher,
    IngredientParser, NaturalLanguageParser, RecipeDiff, SimilarityScorer, MATCH_THRESHOLD,
};
pub use model::{
    IngredientStatus, MatchResult, NewPantryItem, PantryItem, PantryItemUpdate,
    ParsedIngredient, RecipeDiffResult, ShoppingListItem,
};
pub use pantry::{PantryFilter, PantryStore};
pub use pipelines::{PhotoAnalysis, RecipeDiffRequest};
pub use shopping::whole_foods_url;
pub use vision::{analyze_image, GeminiVision, VisionAnalyzer};
