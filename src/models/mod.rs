//! Data models
//!
//! Rust structs representing database entities.

mod recipe;
mod recipe_ingredient;

pub use recipe::{Recipe, RecipeCreate, RecipeUpdate};
pub use recipe_ingredient::{RecipeIngredient, RecipeIngredientCreate, RecipeIngredientUpdate};
