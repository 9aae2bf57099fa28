mod shopping_list;
mod store;

pub use store::{PantryFilter, PantryStore};
