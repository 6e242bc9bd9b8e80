//! Hearth MCP Server Implementation
//!
//! Implements the MCP server with all Hearth tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::measure::RawAmount;
use crate::models::{RecipeCreate, RecipeIngredientCreate, RecipeIngredientUpdate, RecipeUpdate};
use crate::tools::measure;
use crate::tools::recipes::{self, IngredientInput};
use crate::tools::status::StatusTracker;

/// Hearth MCP Service
#[derive(Clone)]
pub struct HearthService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<HearthService>,
}

impl HearthService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        what, id
    ))]))
}

// ============================================================================
// Shared Parameter Types
// ============================================================================

/// A number such as 200 or 1.5, or free text such as "1/2" or "a pinch"
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum AmountParam {
    Number(f64),
    Text(String),
}

impl From<AmountParam> for RawAmount {
    fn from(p: AmountParam) -> Self {
        match p {
            AmountParam::Number(n) => RawAmount::Number(n),
            AmountParam::Text(s) => RawAmount::Text(s),
        }
    }
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParam {
    /// Ingredient name
    pub name: String,
    /// Amount for the recipe's own serving count (optional)
    pub amount: Option<AmountParam>,
    /// Unit tag: g, kg, ml, l, oz, lb, fl oz, cup, tbsp, tsp, piece, pinch, ... (optional)
    pub unit: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Name of the recipe
    pub name: String,
    /// Number of servings this recipe yields (default 1, minimum 1)
    #[serde(default = "default_servings")]
    pub servings: u32,
    /// Optional notes
    pub notes: Option<String>,
    /// Ingredients in display order (optional)
    #[serde(default)]
    pub ingredients: Vec<IngredientParam>,
}

fn default_servings() -> u32 { 1 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Search query for recipe name (optional)
    pub query: Option<String>,
    /// Sort by: name, created_at, or servings (default name)
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Sort order: asc or desc (default asc)
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_sort_by() -> String { "name".to_string() }
fn default_sort_order() -> String { "asc".to_string() }
fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New serving count (optional, minimum 1)
    pub servings: Option<u32>,
    /// New notes (optional)
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    /// Recipe ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeIngredientParams {
    /// Recipe ID to add the ingredient to
    pub recipe_id: i64,
    /// Ingredient name
    pub name: String,
    /// Amount (number or free text, optional)
    pub amount: Option<AmountParam>,
    /// Unit tag (optional)
    pub unit: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeIngredientParams {
    /// Recipe ingredient ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New amount (optional)
    pub amount: Option<AmountParam>,
    /// New unit (optional)
    pub unit: Option<String>,
    /// New notes (optional)
    pub notes: Option<String>,
    /// Set true to remove the amount
    pub clear_amount: Option<bool>,
    /// Set true to remove the unit
    pub clear_unit: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveRecipeIngredientParams {
    /// Recipe ingredient ID to remove
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ViewRecipeParams {
    /// Recipe ID
    pub id: i64,
    /// Servings to scale to (defaults to the recipe's own serving count)
    pub current_servings: Option<u32>,
    /// Show metric amounts in imperial units (default false: imperial shown as metric)
    #[serde(default)]
    pub show_alternative: bool,
}

// ============================================================================
// Measurement Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleAmountParams {
    /// Amount to scale (number or free text, optional)
    pub amount: Option<AmountParam>,
    /// Servings the amount is written for
    pub original_servings: u32,
    /// Servings to scale to
    pub current_servings: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertAmountParams {
    /// Amount to convert
    pub amount: f64,
    /// Unit the amount is in
    pub from_unit: String,
    /// Target unit (defaults to the unit's counterpart in the other system)
    pub to_unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenderAmountParams {
    /// Amount (number or free text, optional)
    pub amount: Option<AmountParam>,
    /// Unit (optional)
    pub unit: Option<String>,
    /// Show metric amounts in imperial units (default false)
    #[serde(default)]
    pub show_alternative: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl HearthService {
    // --- Status ---

    #[tool(description = "Get the current status of the Hearth service including build info, database status, and process information")]
    async fn hearth_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status(&self.database))
    }

    #[tool(description = "Get instructions for storing recipes and viewing them scaled and in metric or imperial units. Call this when unsure how to use the recipe tools.")]
    fn recipe_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::RECIPE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(RECIPE_INSTRUCTIONS)]))
    }

    // --- Recipes ---

    #[tool(description = "Create a recipe with its serving count and optionally its ingredients")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate { name: p.name, servings: p.servings, notes: p.notes };
        let ingredients = p
            .ingredients
            .into_iter()
            .map(|i| IngredientInput {
                name: i.name,
                amount: i.amount.map(RawAmount::from),
                unit: i.unit,
                notes: i.notes,
            })
            .collect();
        let result = recipes::create_recipe(&self.database, data, ingredients)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a recipe with its ingredients as stored")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        match recipes::get_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(recipe) => to_json(&recipe),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "List recipes with optional name search, sorting, and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.query.as_deref(), &p.sort_by, &p.sort_order, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a recipe's name, serving count, or notes")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate { name: p.name, servings: p.servings, notes: p.notes };
        match recipes::update_recipe(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))? {
            Some(resp) => to_json(&resp),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "Delete a recipe and all of its ingredients")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Recipe Ingredients ---

    #[tool(description = "Add an ingredient to the end of a recipe's ingredient list")]
    fn add_recipe_ingredient(&self, Parameters(p): Parameters<AddRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientCreate {
            recipe_id: p.recipe_id,
            name: p.name,
            amount: p.amount.map(RawAmount::from),
            unit: p.unit,
            notes: p.notes,
        };
        let result = recipes::add_recipe_ingredient(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a recipe ingredient's name, amount, unit, or notes")]
    fn update_recipe_ingredient(&self, Parameters(p): Parameters<UpdateRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientUpdate {
            name: p.name,
            amount: p.amount.map(RawAmount::from),
            unit: p.unit,
            notes: p.notes,
            clear_amount: p.clear_amount.unwrap_or(false),
            clear_unit: p.clear_unit.unwrap_or(false),
        };
        match recipes::update_recipe_ingredient(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))? {
            Some(ingredient) => to_json(&ingredient),
            None => not_found("Recipe ingredient", p.id),
        }
    }

    #[tool(description = "Remove an ingredient from its recipe")]
    fn remove_recipe_ingredient(&self, Parameters(p): Parameters<RemoveRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::remove_recipe_ingredient(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "View a recipe scaled to a serving count, with every amount rendered in the preferred measurement system")]
    fn view_recipe(&self, Parameters(p): Parameters<ViewRecipeParams>) -> Result<CallToolResult, McpError> {
        match recipes::view_recipe(&self.database, p.id, p.current_servings, p.show_alternative)
            .map_err(|e| McpError::internal_error(e, None))?
        {
            Some(view) => to_json(&view),
            None => not_found("Recipe", p.id),
        }
    }

    // --- Measurements ---

    #[tool(description = "Scale one ingredient amount from one serving count to another")]
    fn scale_amount(&self, Parameters(p): Parameters<ScaleAmountParams>) -> Result<CallToolResult, McpError> {
        to_json(&measure::scale_amount(p.amount.map(RawAmount::from), p.original_servings, p.current_servings))
    }

    #[tool(description = "Convert an amount between units. Without to_unit, converts to the unit's counterpart in the other measurement system.")]
    fn convert_amount(&self, Parameters(p): Parameters<ConvertAmountParams>) -> Result<CallToolResult, McpError> {
        let result = measure::convert_amount(p.amount, &p.from_unit, p.to_unit.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Render an amount and unit as display text, converting between metric and imperial according to show_alternative")]
    fn render_amount(&self, Parameters(p): Parameters<RenderAmountParams>) -> Result<CallToolResult, McpError> {
        to_json(&measure::render_amount(p.amount.map(RawAmount::from), p.unit.as_deref(), p.show_alternative))
    }

    #[tool(description = "List every known unit with its measurement system and cross-system counterpart")]
    fn list_units(&self) -> Result<CallToolResult, McpError> {
        to_json(&measure::list_units())
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for HearthService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "hearth".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Hearth".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Hearth - household recipes with serving scaling and metric/imperial display. \
                 Call recipe_instructions first if unsure. \
                 Recipes: create/get/list/update/delete_recipe, add/update/remove_recipe_ingredient, \
                 view_recipe (scaled and rendered). \
                 Measurements: scale_amount, convert_amount, render_amount, list_units. \
                 Status: hearth_status."
                    .into(),
            ),
        }
    }
}
