//! Recipe MCP Tools
//!
//! Tools for managing recipes and their ingredients, and for viewing a recipe
//! scaled to a serving count in the preferred measurement system.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::measure::{render_amount_parts, scale, RawAmount};
use crate::models::{
    Recipe, RecipeCreate, RecipeIngredient, RecipeIngredientCreate, RecipeIngredientUpdate,
    RecipeUpdate,
};

/// Ingredient supplied when creating a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub amount: Option<RawAmount>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub ingredient_count: usize,
    pub created_at: String,
}

/// Full recipe with its ingredients as stored
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub ingredients: Vec<RecipeIngredient>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub ingredient_count: i64,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for successful update
#[derive(Debug, Serialize)]
pub struct RecipeUpdateResponse {
    pub success: bool,
    pub servings: u32,
    pub updated_at: String,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for add_recipe_ingredient
#[derive(Debug, Serialize)]
pub struct AddIngredientResponse {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub amount: Option<RawAmount>,
    pub unit: Option<String>,
    pub position: i64,
}

/// One ingredient line as it should be displayed
#[derive(Debug, Clone, Serialize)]
pub struct IngredientView {
    pub id: i64,
    pub name: String,
    pub amount: Option<RawAmount>,
    pub unit: Option<String>,
    pub scaled_amount: Option<RawAmount>,
    pub display: String,
    pub converted: bool,
    pub notes: Option<String>,
}

/// A recipe scaled to `current_servings` and rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub name: String,
    pub original_servings: u32,
    pub current_servings: u32,
    pub show_alternative: bool,
    pub ingredients: Vec<IngredientView>,
    pub notes: Option<String>,
}

fn validate_name(name: &str, what: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{} name cannot be empty", what));
    }
    Ok(())
}

fn validate_servings(servings: u32) -> Result<(), String> {
    if servings == 0 {
        return Err("servings must be at least 1".to_string());
    }
    Ok(())
}

fn validate_amount(amount: Option<&RawAmount>) -> Result<(), String> {
    if let Some(n) = amount.and_then(RawAmount::as_number) {
        if n < 0.0 {
            return Err(format!("amount cannot be negative: {}", n));
        }
    }
    Ok(())
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a recipe, optionally with its ingredients, in one transaction
pub fn create_recipe(
    db: &Database,
    data: RecipeCreate,
    ingredients: Vec<IngredientInput>,
) -> Result<CreateRecipeResponse, String> {
    validate_name(&data.name, "Recipe")?;
    validate_servings(data.servings)?;
    for ingredient in &ingredients {
        validate_name(&ingredient.name, "Ingredient")?;
        validate_amount(ingredient.amount.as_ref())?;
    }

    let data = RecipeCreate {
        name: data.name.trim().to_string(),
        ..data
    };

    let (recipe, ingredient_count) = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let recipe = Recipe::create(&tx, &data)?;
            for ingredient in ingredients {
                RecipeIngredient::create(
                    &tx,
                    &RecipeIngredientCreate {
                        recipe_id: recipe.id,
                        name: ingredient.name.trim().to_string(),
                        amount: ingredient.amount,
                        unit: ingredient.unit,
                        notes: ingredient.notes,
                    },
                )?;
            }
            let count = RecipeIngredient::count_for_recipe(&tx, recipe.id)?;
            tx.commit()?;
            Ok((recipe, count))
        })
        .map_err(|e| format!("Failed to create recipe: {}", e))?;

    tracing::info!("Created recipe {} '{}'", recipe.id, recipe.name);

    Ok(CreateRecipeResponse {
        id: recipe.id,
        name: recipe.name,
        servings: recipe.servings,
        ingredient_count: ingredient_count as usize,
        created_at: recipe.created_at,
    })
}

/// Get a recipe with its stored ingredients
pub fn get_recipe(db: &Database, id: i64) -> Result<Option<RecipeDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let Some(recipe) = Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?
    else {
        return Ok(None);
    };

    let ingredients = RecipeIngredient::get_for_recipe(&conn, id)
        .map_err(|e| format!("Failed to get ingredients: {}", e))?;

    Ok(Some(RecipeDetail {
        id: recipe.id,
        name: recipe.name,
        servings: recipe.servings,
        ingredients,
        notes: recipe.notes,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }))
}

/// List recipes with filtering and pagination
pub fn list_recipes(
    db: &Database,
    query: Option<&str>,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, query, sort_by, sort_order, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let total = Recipe::count(&conn, query)
        .map_err(|e| format!("Failed to count recipes: {}", e))?;

    let mut summaries = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let ingredient_count = RecipeIngredient::count_for_recipe(&conn, recipe.id)
            .map_err(|e| format!("Failed to count ingredients: {}", e))?;

        summaries.push(RecipeSummary {
            id: recipe.id,
            name: recipe.name,
            servings: recipe.servings,
            ingredient_count,
        });
    }

    Ok(ListRecipesResponse {
        recipes: summaries,
        total,
        limit,
        offset,
    })
}

/// Update a recipe's name, serving count, or notes
pub fn update_recipe(
    db: &Database,
    id: i64,
    data: RecipeUpdate,
) -> Result<Option<RecipeUpdateResponse>, String> {
    if let Some(ref name) = data.name {
        validate_name(name, "Recipe")?;
    }
    if let Some(servings) = data.servings {
        validate_servings(servings)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Recipe::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update recipe: {}", e))?;

    Ok(updated.map(|recipe| RecipeUpdateResponse {
        success: true,
        servings: recipe.servings,
        updated_at: recipe.updated_at,
    }))
}

/// Delete a recipe and its ingredients
pub fn delete_recipe(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Recipe::delete(&conn, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;
    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }

    tracing::info!("Deleted recipe {}", id);
    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

// ============================================================================
// Recipe Ingredient Tools
// ============================================================================

/// Add an ingredient to the end of a recipe
pub fn add_recipe_ingredient(
    db: &Database,
    data: RecipeIngredientCreate,
) -> Result<AddIngredientResponse, String> {
    validate_name(&data.name, "Ingredient")?;
    validate_amount(data.amount.as_ref())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, data.recipe_id)
        .map_err(|e| format!("Database error checking recipe: {}", e))?;
    if recipe.is_none() {
        return Err(format!("Recipe not found with id: {}", data.recipe_id));
    }

    let ingredient = RecipeIngredient::create(&conn, &data)
        .map_err(|e| format!("Failed to add ingredient: {}", e))?;

    Ok(AddIngredientResponse {
        id: ingredient.id,
        recipe_id: ingredient.recipe_id,
        name: ingredient.name,
        amount: ingredient.amount,
        unit: ingredient.unit,
        position: ingredient.position,
    })
}

/// Update an ingredient's name, amount, unit, or notes
pub fn update_recipe_ingredient(
    db: &Database,
    id: i64,
    data: RecipeIngredientUpdate,
) -> Result<Option<RecipeIngredient>, String> {
    if let Some(ref name) = data.name {
        validate_name(name, "Ingredient")?;
    }
    validate_amount(data.amount.as_ref())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    RecipeIngredient::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update ingredient: {}", e))
}

/// Remove an ingredient from its recipe
pub fn remove_recipe_ingredient(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = RecipeIngredient::delete(&conn, id)
        .map_err(|e| format!("Failed to remove ingredient: {}", e))?;
    if !deleted {
        return Err(format!("Recipe ingredient not found with id: {}", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

// ============================================================================
// Recipe View
// ============================================================================

/// Scale and render every ingredient of a recipe
///
/// All display surfaces go through here so scaling and unit rendering are
/// applied the same way everywhere.
pub fn build_view(
    recipe: &Recipe,
    ingredients: &[RecipeIngredient],
    current_servings: u32,
    show_alternative: bool,
) -> RecipeView {
    let ingredients = ingredients
        .iter()
        .map(|ingredient| {
            let scaled = scale(ingredient.amount.as_ref(), recipe.servings, current_servings);
            let rendered =
                render_amount_parts(scaled.as_ref(), ingredient.unit.as_deref(), show_alternative);

            IngredientView {
                id: ingredient.id,
                name: ingredient.name.clone(),
                amount: ingredient.amount.clone(),
                unit: ingredient.unit.clone(),
                scaled_amount: scaled,
                display: rendered.display,
                converted: rendered.converted,
                notes: ingredient.notes.clone(),
            }
        })
        .collect();

    RecipeView {
        id: recipe.id,
        name: recipe.name.clone(),
        original_servings: recipe.servings,
        current_servings,
        show_alternative,
        ingredients,
        notes: recipe.notes.clone(),
    }
}

/// View a recipe scaled to `current_servings` (defaults to the recipe's own
/// serving count)
pub fn view_recipe(
    db: &Database,
    id: i64,
    current_servings: Option<u32>,
    show_alternative: bool,
) -> Result<Option<RecipeView>, String> {
    if let Some(servings) = current_servings {
        validate_servings(servings)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let Some(recipe) = Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?
    else {
        return Ok(None);
    };

    let ingredients = RecipeIngredient::get_for_recipe(&conn, id)
        .map_err(|e| format!("Failed to get ingredients: {}", e))?;

    let current = current_servings.unwrap_or(recipe.servings);
    Ok(Some(build_view(&recipe, &ingredients, current, show_alternative)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn ingredient(name: &str, amount: Option<RawAmount>, unit: Option<&str>) -> IngredientInput {
        IngredientInput {
            name: name.to_string(),
            amount,
            unit: unit.map(str::to_string),
            notes: None,
        }
    }

    fn soup(db: &Database) -> i64 {
        create_recipe(
            db,
            RecipeCreate {
                name: "Tomato Soup".to_string(),
                servings: 4,
                notes: None,
            },
            vec![
                ingredient("Stock", Some(RawAmount::Number(200.0)), Some("ml")),
                ingredient("Butter", Some(RawAmount::Number(1.0)), Some("tbsp")),
                ingredient("Salt", Some(RawAmount::from("a pinch")), None),
                ingredient("Tomatoes", Some(RawAmount::Number(3.0)), Some("piece")),
            ],
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_create_recipe_with_ingredients() {
        let db = setup();
        let id = soup(&db);

        let detail = get_recipe(&db, id).unwrap().unwrap();
        assert_eq!(detail.servings, 4);
        assert_eq!(detail.ingredients.len(), 4);
        assert_eq!(detail.ingredients[0].name, "Stock");
    }

    #[test]
    fn test_create_recipe_validation() {
        let db = setup();
        let empty_name = RecipeCreate {
            name: "  ".to_string(),
            servings: 2,
            notes: None,
        };
        assert!(create_recipe(&db, empty_name, vec![]).is_err());

        let zero_servings = RecipeCreate {
            name: "Bread".to_string(),
            servings: 0,
            notes: None,
        };
        assert!(create_recipe(&db, zero_servings, vec![]).is_err());

        let negative = RecipeCreate {
            name: "Bread".to_string(),
            servings: 2,
            notes: None,
        };
        let bad = vec![ingredient("Flour", Some(RawAmount::Number(-1.0)), Some("g"))];
        assert!(create_recipe(&db, negative, bad).is_err());

        assert_eq!(list_recipes(&db, None, "name", "asc", 50, 0).unwrap().total, 0);
    }

    #[test]
    fn test_view_defaults_to_original_servings() {
        let db = setup();
        let id = soup(&db);

        let view = view_recipe(&db, id, None, false).unwrap().unwrap();
        assert_eq!(view.current_servings, 4);
        assert_eq!(view.ingredients[0].display, "200 ml");
    }

    #[test]
    fn test_view_scales_and_converts() {
        let db = setup();
        let id = soup(&db);

        let metric = view_recipe(&db, id, Some(8), false).unwrap().unwrap();
        let stock = &metric.ingredients[0];
        assert_eq!(stock.scaled_amount, Some(RawAmount::Number(400.0)));
        assert_eq!(stock.display, "400 ml");
        assert!(!stock.converted);

        // tbsp is imperial, so it is shown in ml while alternative units are off
        let butter = &metric.ingredients[1];
        assert_eq!(butter.display, "≈ 29.6 ml");
        assert!(butter.converted);

        assert_eq!(metric.ingredients[2].display, "a pinch");
        assert_eq!(metric.ingredients[3].display, "6 piece");

        let imperial = view_recipe(&db, id, Some(8), true).unwrap().unwrap();
        assert_eq!(imperial.ingredients[0].display, "≈ 13.5 fl oz");
        assert_eq!(imperial.ingredients[1].display, "2 tbsp");
        assert_eq!(imperial.ingredients[3].display, "6 piece");
    }

    #[test]
    fn test_view_rejects_zero_servings() {
        let db = setup();
        let id = soup(&db);
        assert!(view_recipe(&db, id, Some(0), false).is_err());
        assert!(view_recipe(&db, 999, None, false).unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete_recipe() {
        let db = setup();
        let id = soup(&db);

        let update = RecipeUpdate {
            servings: Some(2),
            ..Default::default()
        };
        let updated = update_recipe(&db, id, update).unwrap().unwrap();
        assert_eq!(updated.servings, 2);

        let bad = RecipeUpdate {
            servings: Some(0),
            ..Default::default()
        };
        assert!(update_recipe(&db, id, bad).is_err());

        delete_recipe(&db, id).unwrap();
        assert!(get_recipe(&db, id).unwrap().is_none());
        assert!(delete_recipe(&db, id).is_err());
    }

    #[test]
    fn test_ingredient_tools() {
        let db = setup();
        let id = soup(&db);

        let added = add_recipe_ingredient(
            &db,
            RecipeIngredientCreate {
                recipe_id: id,
                name: "Basil".to_string(),
                amount: Some(RawAmount::Number(1.0)),
                unit: Some("bunch".to_string()),
                notes: None,
            },
        )
        .unwrap();
        assert_eq!(added.position, 5);

        let update = RecipeIngredientUpdate {
            amount: Some(RawAmount::Number(2.0)),
            ..Default::default()
        };
        let updated = update_recipe_ingredient(&db, added.id, update).unwrap().unwrap();
        assert_eq!(updated.amount, Some(RawAmount::Number(2.0)));

        remove_recipe_ingredient(&db, added.id).unwrap();
        assert!(remove_recipe_ingredient(&db, added.id).is_err());

        let missing_recipe = add_recipe_ingredient(
            &db,
            RecipeIngredientCreate {
                recipe_id: 999,
                name: "Basil".to_string(),
                amount: None,
                unit: None,
                notes: None,
            },
        );
        assert!(missing_recipe.is_err());
    }

    #[test]
    fn test_list_recipes_counts_ingredients() {
        let db = setup();
        soup(&db);
        let list = list_recipes(&db, Some("soup"), "name", "asc", 500, -3).unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.limit, 200);
        assert_eq!(list.offset, 0);
        assert_eq!(list.recipes[0].ingredient_count, 4);
    }
}
