use log::debug;
use serde::{Deserialize, Serialize};

use crate::ingredients::RecipeDiff;
use crate::model::RecipeDiffResult;
use crate::pantry::PantryStore;

/// A recipe to compare against the pantry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDiffRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RecipeDiffRequest {
    pub fn new<S: Into<String>>(ingredients: impl IntoIterator<Item = S>) -> Self {
        Self {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// One ingredient per non-blank line of `text`
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().filter(|line| !line.trim().is_empty()))
    }
}

/// Diff a recipe against the store's current contents.
///
/// Pantry names are read once, so every line is compared against the same snapshot.
pub fn process(store: &PantryStore, request: &RecipeDiffRequest, differ: &RecipeDiff) -> RecipeDiffResult {
    let pantry_names = store.names();
    debug!(
        "Diffing {} ingredient lines against {} pantry items",
        request.ingredients.len(),
        pantry_names.len()
    );

    differ.diff(
        &request.ingredients,
        &pantry_names,
        request.title.clone(),
        request.url.clone(),
    )
}
