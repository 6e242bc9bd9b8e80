//! Recipe model
//!
//! A recipe and the serving count its ingredient amounts are written for.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A stored recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    pub notes: Option<String>,
}

fn default_servings() -> u32 {
    1
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub servings: Option<u32>,
    pub notes: Option<String>,
}

impl Recipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            servings: row.get("servings")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe into the database
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO recipes (name, servings, notes) VALUES (?1, ?2, ?3)",
            params![data.name, data.servings, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound("Recipe", id))
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List recipes, optionally filtered by a name substring
    pub fn list(
        conn: &Connection,
        query: Option<&str>,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order = if sort_order.eq_ignore_ascii_case("desc") { "DESC" } else { "ASC" };
        let sort_col = match sort_by.to_lowercase().as_str() {
            "created_at" => "created_at",
            "servings" => "servings",
            _ => "name",
        };

        let recipes = match query {
            Some(q) => {
                let sql = format!(
                    "SELECT * FROM recipes WHERE name LIKE ?1 ORDER BY {} {} LIMIT ?2 OFFSET ?3",
                    sort_col, order
                );
                let mut stmt = conn.prepare(&sql)?;
                let pattern = format!("%{}%", q);
                let rows = stmt
                    .query_map(params![pattern, limit, offset], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let sql = format!(
                    "SELECT * FROM recipes ORDER BY {} {} LIMIT ?1 OFFSET ?2",
                    sort_col, order
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![limit, offset], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(recipes)
    }

    /// Count recipes matching an optional name filter
    pub fn count(conn: &Connection, query: Option<&str>) -> DbResult<i64> {
        let count = match query {
            Some(q) => conn.query_row(
                "SELECT COUNT(*) FROM recipes WHERE name LIKE ?1",
                [format!("%{}%", q)],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// Update a recipe; returns None if it does not exist
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(servings) = data.servings {
            updates.push(format!("servings = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(servings));
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
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a recipe and, by cascade, its ingredients
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn create(conn: &Connection, name: &str, servings: u32) -> Recipe {
        Recipe::create(
            conn,
            &RecipeCreate {
                name: name.to_string(),
                servings,
                notes: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let recipe = create(&conn, "Pancakes", 4);
        assert_eq!(recipe.servings, 4);

        let fetched = Recipe::get_by_id(&conn, recipe.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Pancakes");
        assert!(Recipe::get_by_id(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let conn = setup();
        create(&conn, "Tomato Soup", 2);
        create(&conn, "Apple Pie", 8);
        create(&conn, "Onion Soup", 4);

        let all = Recipe::list(&conn, None, "name", "asc", 50, 0).unwrap();
        let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Apple Pie", "Onion Soup", "Tomato Soup"]);

        let soups = Recipe::list(&conn, Some("Soup"), "servings", "desc", 50, 0).unwrap();
        assert_eq!(soups.len(), 2);
        assert_eq!(soups[0].name, "Onion Soup");
        assert_eq!(Recipe::count(&conn, Some("Soup")).unwrap(), 2);
        assert_eq!(Recipe::count(&conn, None).unwrap(), 3);
    }

    #[test]
    fn test_update() {
        let conn = setup();
        let recipe = create(&conn, "Stew", 4);

        let update = RecipeUpdate {
            servings: Some(6),
            ..Default::default()
        };
        let updated = Recipe::update(&conn, recipe.id, &update).unwrap().unwrap();
        assert_eq!(updated.servings, 6);
        assert_eq!(updated.name, "Stew");

        assert!(Recipe::update(&conn, 999, &update).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let conn = setup();
        let recipe = create(&conn, "Toast", 1);
        assert!(Recipe::delete(&conn, recipe.id).unwrap());
        assert!(!Recipe::delete(&conn, recipe.id).unwrap());
    }
}
