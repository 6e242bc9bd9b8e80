//! Print a stored recipe scaled to a serving count
//!
//! Usage: show_recipe <recipe_id> [servings] [--alt]

use hearth::{config, db, tools::recipes};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut show_alternative = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--alt" {
            show_alternative = true;
        } else {
            positional.push(arg);
        }
    }

    let Some(id) = positional.first() else {
        eprintln!("Usage: show_recipe <recipe_id> [servings] [--alt]");
        std::process::exit(2);
    };
    let id: i64 = id.parse()?;
    let servings: Option<u32> = positional.get(1).map(|s| s.parse()).transpose()?;

    let db_path = config::database_path();
    let database = db::Database::new(&db_path)?;
    database.with_conn(db::migrations::run_migrations)?;

    let view = match recipes::view_recipe(&database, id, servings, show_alternative)? {
        Some(view) => view,
        None => {
            eprintln!("Recipe {} not found in {}", id, db_path.display());
            std::process::exit(1);
        }
    };

    println!("{} ({} servings)", view.name, view.current_servings);
    for ingredient in &view.ingredients {
        if ingredient.display.is_empty() {
            println!("  - {}", ingredient.name);
        } else {
            println!("  - {} {}", ingredient.display, ingredient.name);
        }
    }

    Ok(())
}
