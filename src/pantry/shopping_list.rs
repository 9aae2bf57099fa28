use chrono::Utc;
use log::debug;

use super::PantryStore;
use crate::error::PantryError;
use crate::model::{normalize_name, RecipeDiffResult, ShoppingListItem};

impl PantryStore {
    pub fn shopping_list(&self) -> &[ShoppingListItem] {
        &self.data.shopping_list
    }

    /// Queue every missing ingredient of a diff for purchase.
    ///
    /// Ingredients already on the list and not yet purchased are skipped.
    /// Returns the entries that were added.
    pub fn add_missing(&mut self, diff: &RecipeDiffResult) -> Vec<ShoppingListItem> {
        let source_recipe = diff.source_label();
        let mut added = Vec::new();

        for status in diff.missing() {
            let name = normalize_name(&status.name);
            if name.is_empty() {
                continue;
            }
            let queued = self
                .data
                .shopping_list
                .iter()
                .any(|entry| !entry.purchased && entry.name == name);
            if queued {
                debug!("{:?} is already on the shopping list", name);
                continue;
            }

            self.data.last_shopping_id += 1;
            let entry = ShoppingListItem {
                id: self.data.last_shopping_id,
                name,
                quantity: status.quantity,
                unit: status.unit.clone(),
                source_recipe: source_recipe.clone(),
                search_url: status.search_url.clone(),
                purchased: false,
                created_at: Utc::now(),
            };
            self.data.shopping_list.push(entry.clone());
            added.push(entry);
        }

        added
    }

    pub fn set_purchased(&mut self, id: i64, purchased: bool) -> Result<ShoppingListItem, PantryError> {
        let entry = self
            .data
            .shopping_list
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(PantryError::NotFound(id))?;
        entry.purchased = purchased;
        Ok(entry.clone())
    }

    pub fn remove_shopping_item(&mut self, id: i64) -> Result<ShoppingListItem, PantryError> {
        let index = self
            .data
            .shopping_list
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(PantryError::NotFound(id))?;
        Ok(self.data.shopping_list.remove(index))
    }

    /// Drop purchased entries, returning how many were removed
    pub fn clear_purchased(&mut self) -> usize {
        let before = self.data.shopping_list.len();
        self.data.shopping_list.retain(|entry| !entry.purchased);
        before - self.data.shopping_list.len()
    }
}
