use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalize an item or ingredient name the way the pantry stores it.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A grocery item stored in the pantry.
///
/// `name` is always lowercase and trimmed. `id` never changes once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: i64,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a pantry item.
///
/// Also the shape of every item the vision analyzer detects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPantryItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPantryItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fold a duplicate into this item: quantities add up and empty
    /// optional fields are filled from `other`.
    pub(crate) fn absorb(&mut self, other: NewPantryItem) {
        if let Some(extra) = other.quantity {
            self.quantity = Some(self.quantity.unwrap_or(0.0) + extra);
        }
        fill_empty(&mut self.unit, other.unit);
        fill_empty(&mut self.category, other.category);
        fill_empty(&mut self.notes, other.notes);
    }
}

/// Partial edit of a pantry item. Only the fields that are set get applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PantryItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An ingredient queued for purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: i64,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub source_recipe: Option<String>,
    pub search_url: Option<String>,
    pub purchased: bool,
    pub created_at: DateTime<Utc>,
}

/// Structured view of one free-text ingredient line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    pub raw: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub comment: Option<String>,
}

/// Outcome of matching one ingredient name against the pantry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub ingredient_name: String,
    pub in_pantry: bool,
    pub pantry_match: Option<String>,
    pub score: f64,
}

impl MatchResult {
    pub(crate) fn missing(ingredient_name: &str) -> Self {
        Self {
            ingredient_name: ingredient_name.to_string(),
            in_pantry: false,
            pantry_match: None,
            score: 0.0,
        }
    }
}

/// Per-line record of a recipe diff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientStatus {
    /// The line exactly as the caller supplied it
    pub raw: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub comment: Option<String>,
    pub in_pantry: bool,
    pub pantry_match: Option<String>,
    pub match_score: f64,
    /// Purchase link, only present for missing ingredients
    pub search_url: Option<String>,
}

/// Result of comparing a recipe against the pantry
///
/// `missing_count + in_pantry_count == ingredients.len()` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDiffResult {
    pub title: Option<String>,
    pub url: Option<String>,
    pub ingredients: Vec<IngredientStatus>,
    pub missing_count: usize,
    pub in_pantry_count: usize,
}

impl RecipeDiffResult {
    pub fn missing(&self) -> impl Iterator<Item = &IngredientStatus> {
        self.ingredients.iter().filter(|status| !status.in_pantry)
    }

    /// Human readable label for the recipe: its title, else its URL
    pub fn source_label(&self) -> Option<String> {
        self.title.clone().or_else(|| self.url.clone())
    }
}

fn fill_empty(slot: &mut Option<String>, value: Option<String>) {
    let is_empty = slot.as_deref().map_or(true, |s| s.is_empty());
    if is_empty {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *slot = Some(value);
        }
    }
}

pub(crate) fn fill_empty_field(slot: &mut Option<String>, value: &Option<String>) {
    fill_empty(slot, value.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Olive Oil "), "olive oil");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_absorb_sums_quantities_and_fills_gaps() {
        let mut item = NewPantryItem {
            name: "eggs".to_string(),
            quantity: Some(6.0),
            unit: None,
            category: Some("dairy".to_string()),
            notes: None,
        };
        item.absorb(NewPantryItem {
            name: "Eggs".to_string(),
            quantity: Some(12.0),
            unit: Some("count".to_string()),
            category: Some("protein".to_string()),
            notes: Some("free range".to_string()),
        });

        assert_eq!(item.quantity, Some(18.0));
        assert_eq!(item.unit.as_deref(), Some("count"));
        assert_eq!(item.category.as_deref(), Some("dairy"));
        assert_eq!(item.notes.as_deref(), Some("free range"));
    }

    #[test]
    fn test_absorb_without_quantity_keeps_existing() {
        let mut item = NewPantryItem {
            quantity: Some(2.0),
            ..NewPantryItem::named("milk")
        };
        item.absorb(NewPantryItem::named("milk"));
        assert_eq!(item.quantity, Some(2.0));

        let mut empty = NewPantryItem::named("milk");
        empty.absorb(NewPantryItem {
            quantity: Some(1.0),
            ..NewPantryItem::named("milk")
        });
        assert_eq!(empty.quantity, Some(1.0));
    }

    #[test]
    fn test_new_item_deserializes_with_missing_fields() {
        let item: NewPantryItem = serde_json::from_str(r#"{"name": "rice"}"#).unwrap();
        assert_eq!(item, NewPantryItem::named("rice"));
    }
}
