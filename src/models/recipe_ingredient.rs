//! Recipe Ingredient model
//!
//! Ingredients in a recipe with an optional amount and unit.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row, ToSql};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::measure::RawAmount;

impl ToSql for RawAmount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            RawAmount::Number(n) => ToSqlOutput::from(*n),
            RawAmount::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

impl FromSql for RawAmount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(RawAmount::Number(i as f64)),
            ValueRef::Real(f) => Ok(RawAmount::Number(f)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| RawAmount::Text(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Null | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// An ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub amount: Option<RawAmount>,
    pub unit: Option<String>,
    pub position: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientCreate {
    pub recipe_id: i64,
    pub name: String,
    pub amount: Option<RawAmount>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// Data for updating a recipe ingredient
///
/// `None` leaves a field unchanged. `clear_amount` and `clear_unit` reset the
/// column to absent and take precedence over a new value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeIngredientUpdate {
    pub name: Option<String>,
    pub amount: Option<RawAmount>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub clear_amount: bool,
    #[serde(default)]
    pub clear_unit: bool,
}

impl RecipeIngredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            unit: row.get("unit")?,
            position: row.get("position")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Add an ingredient at the end of a recipe's list
    pub fn create(conn: &Connection, data: &RecipeIngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, name, amount, unit, position, notes)
            VALUES (
                ?1, ?2, ?3, ?4,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM recipe_ingredients WHERE recipe_id = ?1),
                ?5
            )
            "#,
            params![data.recipe_id, data.name, data.amount, data.unit, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound("Recipe ingredient", id))
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipe_ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all ingredients for a recipe in display order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY position, id",
        )?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Count ingredients in a recipe
    pub fn count_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE recipe_id = ?1",
            [recipe_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update an ingredient; returns None if it does not exist
    pub fn update(conn: &Connection, id: i64, data: &RecipeIngredientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if data.clear_amount {
            updates.push("amount = NULL".to_string());
        } else if let Some(ref amount) = data.amount {
            updates.push(format!("amount = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(amount.clone()));
        }
        if data.clear_unit {
            updates.push("unit = NULL".to_string());
        } else if let Some(ref unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.clone()));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipe_ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete an ingredient
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipe_ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Recipe, RecipeCreate};

    fn setup() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let recipe = Recipe::create(
            &conn,
            &RecipeCreate {
                name: "Soup".to_string(),
                servings: 4,
                notes: None,
            },
        )
        .unwrap();
        (conn, recipe.id)
    }

    fn add(
        conn: &Connection,
        recipe_id: i64,
        name: &str,
        amount: Option<RawAmount>,
        unit: Option<&str>,
    ) -> RecipeIngredient {
        RecipeIngredient::create(
            conn,
            &RecipeIngredientCreate {
                recipe_id,
                name: name.to_string(),
                amount,
                unit: unit.map(str::to_string),
                notes: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_amount_column_keeps_numbers_and_text() {
        let (conn, recipe_id) = setup();
        add(&conn, recipe_id, "Stock", Some(RawAmount::Number(200.0)), Some("ml"));
        add(&conn, recipe_id, "Salt", Some(RawAmount::from("a pinch")), None);
        add(&conn, recipe_id, "Bay leaf", None, Some("piece"));

        let items = RecipeIngredient::get_for_recipe(&conn, recipe_id).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].amount, Some(RawAmount::Number(200.0)));
        assert_eq!(items[0].unit.as_deref(), Some("ml"));
        assert_eq!(items[1].amount, Some(RawAmount::from("a pinch")));
        assert_eq!(items[1].unit, None);
        assert_eq!(items[2].amount, None);
    }

    #[test]
    fn test_integer_amount_reads_back_as_number() {
        let (conn, recipe_id) = setup();
        conn.execute(
            "INSERT INTO recipe_ingredients (recipe_id, name, amount) VALUES (?1, 'Eggs', 3)",
            [recipe_id],
        )
        .unwrap();
        let items = RecipeIngredient::get_for_recipe(&conn, recipe_id).unwrap();
        assert_eq!(items[0].amount, Some(RawAmount::Number(3.0)));
    }

    #[test]
    fn test_positions_follow_insertion_order() {
        let (conn, recipe_id) = setup();
        let first = add(&conn, recipe_id, "Onion", None, None);
        let second = add(&conn, recipe_id, "Garlic", None, None);
        assert_eq!(first.position, 1);
        assert_eq!(second.position, 2);
        assert_eq!(RecipeIngredient::count_for_recipe(&conn, recipe_id).unwrap(), 2);
    }

    #[test]
    fn test_update_and_delete() {
        let (conn, recipe_id) = setup();
        let item = add(&conn, recipe_id, "Flour", Some(RawAmount::Number(100.0)), Some("g"));

        let update = RecipeIngredientUpdate {
            amount: Some(RawAmount::Number(250.0)),
            ..Default::default()
        };
        let updated = RecipeIngredient::update(&conn, item.id, &update).unwrap().unwrap();
        assert_eq!(updated.amount, Some(RawAmount::Number(250.0)));
        assert_eq!(updated.unit.as_deref(), Some("g"));

        assert!(RecipeIngredient::delete(&conn, item.id).unwrap());
        assert!(RecipeIngredient::get_by_id(&conn, item.id).unwrap().is_none());
    }

    #[test]
    fn test_update_can_clear_amount_and_unit() {
        let (conn, recipe_id) = setup();
        let item = add(&conn, recipe_id, "Pepper", Some(RawAmount::Number(2.0)), Some("tsp"));

        let update = RecipeIngredientUpdate {
            clear_amount: true,
            clear_unit: true,
            ..Default::default()
        };
        let cleared = RecipeIngredient::update(&conn, item.id, &update).unwrap().unwrap();
        assert_eq!(cleared.amount, None);
        assert_eq!(cleared.unit, None);
        assert_eq!(cleared.name, "Pepper");
    }

    #[test]
    fn test_deleting_recipe_cascades() {
        let (conn, recipe_id) = setup();
        add(&conn, recipe_id, "Water", Some(RawAmount::Number(1.0)), Some("l"));
        Recipe::delete(&conn, recipe_id).unwrap();
        assert_eq!(RecipeIngredient::count_for_recipe(&conn, recipe_id).unwrap(), 0);
    }
}
