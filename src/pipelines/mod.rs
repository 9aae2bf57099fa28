pub mod photo;
pub mod recipe;

pub use photo::PhotoAnalysis;
pub use recipe::RecipeDiffRequest;
