use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::PantryError;
use crate::model::{
    fill_empty_field, normalize_name, NewPantryItem, PantryItem, PantryItemUpdate,
    ShoppingListItem,
};

/// Filter for [`PantryStore::list`]
#[derive(Debug, Clone, Default)]
pub struct PantryFilter {
    /// Case-insensitive category equality
    pub category: Option<String>,
    /// Case-insensitive substring of the item name
    pub search: Option<String>,
}

/// On-disk layout of the pantry file
#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct PantryFile {
    #[serde(default)]
    pub(super) items: Vec<PantryItem>,
    #[serde(default)]
    pub(super) shopping_list: Vec<ShoppingListItem>,
    #[serde(default)]
    pub(super) last_item_id: i64,
    #[serde(default)]
    pub(super) last_shopping_id: i64,
}

impl PantryFile {
    /// Make sure id counters are ahead of every stored id
    fn repair_counters(&mut self) {
        let max_item = self.items.iter().map(|i| i.id).max().unwrap_or(0);
        let max_shopping = self.shopping_list.iter().map(|i| i.id).max().unwrap_or(0);
        self.last_item_id = self.last_item_id.max(max_item);
        self.last_shopping_id = self.last_shopping_id.max(max_shopping);
    }
}

/// Grocery inventory plus shopping list, optionally backed by a JSON file.
///
/// Mutations happen in memory; call [`PantryStore::save`] to persist them.
/// Hosts that share a store between tasks wrap it in their own lock.
#[derive(Debug, Default)]
pub struct PantryStore {
    path: Option<PathBuf>,
    pub(super) data: PantryFile,
}

impl PantryStore {
    /// A store that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the pantry file at `path`. A missing file is an empty pantry.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PantryError> {
        let path = path.as_ref().to_path_buf();
        let mut data = match fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str::<PantryFile>(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No pantry file at {}, starting empty", path.display());
                PantryFile::default()
            }
            Err(e) => return Err(e.into()),
        };
        data.repair_counters();
        debug!(
            "Loaded {} pantry items and {} shopping list entries",
            data.items.len(),
            data.shopping_list.len()
        );

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the pantry file, replacing the previous one in a single rename.
    /// In-memory stores do nothing.
    pub async fn save(&self) -> Result<(), PantryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(&self.data)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, path).await?;
        debug!("Saved pantry to {}", path.display());
        Ok(())
    }

    /// Items matching `filter`, ordered by name
    pub fn list(&self, filter: &PantryFilter) -> Vec<PantryItem> {
        let category = filter.category.as_deref().map(normalize_name);
        let search = filter.search.as_deref().map(normalize_name);

        let mut items: Vec<PantryItem> = self
            .data
            .items
            .iter()
            .filter(|item| match &category {
                Some(wanted) => item
                    .category
                    .as_deref()
                    .is_some_and(|c| normalize_name(c) == *wanted),
                None => true,
            })
            .filter(|item| match &search {
                Some(needle) => item.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    pub fn get(&self, id: i64) -> Result<&PantryItem, PantryError> {
        self.data
            .items
            .iter()
            .find(|item| item.id == id)
            .ok_or(PantryError::NotFound(id))
    }

    /// Snapshot of item names, in storage order, for ingredient matching
    pub fn names(&self) -> Vec<String> {
        self.data.items.iter().map(|item| item.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.data.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.items.is_empty()
    }

    pub fn create(&mut self, item: NewPantryItem) -> Result<PantryItem, PantryError> {
        let name = validated_name(&item.name)?;
        Ok(self.insert(name, item).clone())
    }

    /// Insert many items at once.
    ///
    /// Items sharing a name (case-insensitively) are merged first, then each
    /// merged item either folds into the pantry item of the same name or is
    /// inserted. Merging adds quantities and fills only empty unit, category
    /// and notes. Returns the affected items in first-seen order. A blank
    /// name rejects the whole batch.
    pub fn bulk_create(&mut self, items: Vec<NewPantryItem>) -> Result<Vec<PantryItem>, PantryError> {
        let mut merged: Vec<(String, NewPantryItem)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for item in items {
            let key = validated_name(&item.name)?;
            match positions.get(&key) {
                Some(&index) => merged[index].1.absorb(item),
                None => {
                    positions.insert(key.clone(), merged.len());
                    merged.push((key, item));
                }
            }
        }

        let mut affected = Vec::with_capacity(merged.len());
        for (key, incoming) in merged {
            let existing = self
                .data
                .items
                .iter_mut()
                .find(|item| normalize_name(&item.name) == key);

            let item = match existing {
                Some(existing) => {
                    if let Some(extra) = incoming.quantity {
                        existing.quantity = Some(existing.quantity.unwrap_or(0.0) + extra);
                    }
                    fill_empty_field(&mut existing.unit, &incoming.unit);
                    fill_empty_field(&mut existing.category, &incoming.category);
                    fill_empty_field(&mut existing.notes, &incoming.notes);
                    existing.updated_at = Utc::now();
                    debug!("Merged {:?} into existing pantry item {}", key, existing.id);
                    existing.clone()
                }
                None => self.insert(key, incoming).clone(),
            };
            affected.push(item);
        }

        Ok(affected)
    }

    /// Apply the fields set in `update`. An empty unit, category or notes
    /// clears that field.
    pub fn update(&mut self, id: i64, update: PantryItemUpdate) -> Result<PantryItem, PantryError> {
        let name = update.name.as_deref().map(validated_name).transpose()?;

        let item = self
            .data
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(PantryError::NotFound(id))?;

        if let Some(name) = name {
            item.name = name;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = Some(quantity);
        }
        if let Some(unit) = update.unit {
            item.unit = non_empty(unit);
        }
        if let Some(category) = update.category {
            item.category = non_empty(category);
        }
        if let Some(notes) = update.notes {
            item.notes = non_empty(notes);
        }
        item.updated_at = Utc::now();

        Ok(item.clone())
    }

    pub fn delete(&mut self, id: i64) -> Result<PantryItem, PantryError> {
        let index = self
            .data
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(PantryError::NotFound(id))?;
        Ok(self.data.items.remove(index))
    }

    fn insert(&mut self, name: String, item: NewPantryItem) -> &PantryItem {
        self.data.last_item_id += 1;
        let now = Utc::now();
        self.data.items.push(PantryItem {
            id: self.data.last_item_id,
            name,
            quantity: item.quantity,
            unit: item.unit.and_then(non_empty),
            category: item.category.and_then(non_empty),
            notes: item.notes.and_then(non_empty),
            created_at: now,
            updated_at: now,
        });
        &self.data.items[self.data.items.len() - 1]
    }
}

fn validated_name(name: &str) -> Result<String, PantryError> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(PantryError::InvalidItem("name cannot be empty".to_string()));
    }
    Ok(name)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
