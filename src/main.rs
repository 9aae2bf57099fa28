//! Command-line front end for the pantry tracker.
//!
//! Usage:
//! ```bash
//! # Add items
//! pantry-tracker add garlic --quantity 3 --unit clove --category produce
//! pantry-tracker bulk '[{"name": "rice", "quantity": 2, "unit": "cup"}]'
//!
//! # What does this recipe still need?
//! pantry-tracker diff --title "Garlic Chicken" "3 cloves garlic" "1 lb chicken breast"
//!
//! # Detect groceries in a receipt photo and add them
//! GEMINI_API_KEY=... pantry-tracker photo receipt.jpg --import
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;

use pantry_tracker::pipelines::{photo, recipe};
use pantry_tracker::vision::{self, image_mime_type, VisionAnalyzer};
use pantry_tracker::{
    load_config, IngredientParser, NewPantryItem, PantryError, PantryFilter, PantryItemUpdate,
    PantryStore, RecipeDiff, RecipeDiffRequest,
};

#[derive(Parser)]
#[command(
    name = "pantry-tracker",
    about = "Track pantry items and check recipes against them",
    long_about = "Keeps a pantry inventory in a JSON file, compares recipe ingredient lists against it, and builds a shopping list for whatever is missing."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Pantry file override (defaults to store.path from pantry.toml)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List pantry items
    List {
        /// Only items in this category
        #[arg(long)]
        category: Option<String>,

        /// Only items whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Add one item
    Add {
        name: String,

        #[arg(long)]
        quantity: Option<f64>,

        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Add many items from a JSON array, merging duplicates
    Bulk {
        /// JSON array of items, e.g. '[{"name": "milk", "quantity": 1}]'
        json: String,
    },

    /// Edit an item; an empty string clears unit, category or notes
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        quantity: Option<f64>,

        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove an item
    Remove { id: i64 },

    /// Parse ingredient lines without touching the pantry
    Parse {
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Compare a recipe's ingredients against the pantry
    Diff {
        /// Ingredient lines
        lines: Vec<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Read ingredient lines from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,

        /// Put the missing ingredients on the shopping list
        #[arg(long)]
        save_missing: bool,
    },

    /// Detect grocery items in a photo
    Photo {
        path: PathBuf,

        /// Add the detected items to the pantry
        #[arg(long)]
        import: bool,
    },

    /// Shopping list commands
    Shopping {
        #[command(subcommand)]
        action: Option<ShoppingCommand>,
    },
}

#[derive(Subcommand)]
enum ShoppingCommand {
    /// Show the shopping list
    List,
    /// Mark an entry as bought
    Purchased { id: i64 },
    /// Mark an entry as not bought yet
    Unpurchased { id: i64 },
    /// Remove an entry
    Remove { id: i64 },
    /// Remove every bought entry
    Clear,
}

#[derive(Serialize)]
struct Cleared {
    removed: usize,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), PantryError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn read_lines(lines: Vec<String>, file: Option<&Path>) -> Result<Vec<String>, PantryError> {
    let mut all = match file {
        Some(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            RecipeDiffRequest::from_text(&text).ingredients
        }
        None => Vec::new(),
    };
    all.extend(lines);
    Ok(all)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config()?;
    let store_path = cli
        .store
        .unwrap_or_else(|| PathBuf::from(&config.store.path));
    debug!("Using pantry file {}", store_path.display());

    let mut store = PantryStore::open(&store_path).await?;

    match cli.command {
        Command::List { category, search } => {
            print_json(&store.list(&PantryFilter { category, search }))?;
        }
        Command::Add {
            name,
            quantity,
            unit,
            category,
            notes,
        } => {
            let item = store.create(NewPantryItem {
                name,
                quantity,
                unit,
                category,
                notes,
            })?;
            store.save().await?;
            print_json(&item)?;
        }
        Command::Bulk { json } => {
            let items: Vec<NewPantryItem> = serde_json::from_str(&json)?;
            let affected = store.bulk_create(items)?;
            store.save().await?;
            print_json(&affected)?;
        }
        Command::Update {
            id,
            name,
            quantity,
            unit,
            category,
            notes,
        } => {
            let item = store.update(
                id,
                PantryItemUpdate {
                    name,
                    quantity,
                    unit,
                    category,
                    notes,
                },
            )?;
            store.save().await?;
            print_json(&item)?;
        }
        Command::Remove { id } => {
            let item = store.delete(id)?;
            store.save().await?;
            print_json(&item)?;
        }
        Command::Parse { lines } => {
            print_json(&IngredientParser::default().parse_many(&lines))?;
        }
        Command::Diff {
            lines,
            title,
            url,
            file,
            save_missing,
        } => {
            let request = RecipeDiffRequest {
                ingredients: read_lines(lines, file.as_deref()).await?,
                title,
                url,
            };
            let result = recipe::process(&store, &request, &RecipeDiff::from_config(&config)?);
            if save_missing {
                let added = store.add_missing(&result);
                info!("Added {} items to the shopping list", added.len());
                store.save().await?;
            }
            print_json(&result)?;
        }
        Command::Photo { path, import } => {
            let mime_type = image_mime_type(&path)?;
            let image = tokio::fs::read(&path).await?;

            let analyzer = vision::shared_analyzer(&config.vision);
            let analysis = photo::process(
                analyzer.as_deref().map(|a| a as &dyn VisionAnalyzer),
                &image,
                mime_type,
            )
            .await?;

            if import {
                let imported = photo::import(&mut store, &analysis)?;
                store.save().await?;
                print_json(&imported)?;
            } else {
                print_json(&analysis)?;
            }
        }
        Command::Shopping { action } => match action.unwrap_or(ShoppingCommand::List) {
            ShoppingCommand::List => print_json(store.shopping_list())?,
            ShoppingCommand::Purchased { id } => {
                let entry = store.set_purchased(id, true)?;
                store.save().await?;
                print_json(&entry)?;
            }
            ShoppingCommand::Unpurchased { id } => {
                let entry = store.set_purchased(id, false)?;
                store.save().await?;
                print_json(&entry)?;
            }
            ShoppingCommand::Remove { id } => {
                let entry = store.remove_shopping_item(id)?;
                store.save().await?;
                print_json(&entry)?;
            }
            ShoppingCommand::Clear => {
                let removed = store.clear_purchased();
                store.save().await?;
                print_json(&Cleared { removed })?;
            }
        },
    }

    Ok(())
}
