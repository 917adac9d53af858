//! Utility to look up a barcode from the command line
//!
//! Usage: lookup_barcode <barcode> [--label] [--save]
//!
//! Prints the normalized food record as JSON, or as a per-serving nutrition
//! label with `--label`. With `--save` the record is also stored in the
//! pantry database.

use smartfood::config::Config;
use smartfood::db::{migrations, Database};
use smartfood::lookup::FoodDatabaseClient;
use smartfood::models::FoodRecord;
use smartfood::nutrition::NutrientUnit;
use smartfood::store::SqliteRecordStore;
use smartfood::tools::foods;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let save = args.iter().any(|a| a == "--save");
    let label = args.iter().any(|a| a == "--label");
    let Some(barcode) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("Usage: lookup_barcode <barcode> [--label] [--save]");
        std::process::exit(2);
    };

    let config = Config::from_env();
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let database = Database::new(&config.database_path)?;
    database.with_conn(migrations::run_migrations)?;
    let store = SqliteRecordStore::new(database);

    let client = FoodDatabaseClient::new(&config.api_base_url, config.http_timeout)?;
    let lookup = foods::lookup_barcode(&client, &store, barcode).await?;
    if label {
        print_label(&lookup.food);
    } else {
        println!("{}", serde_json::to_string_pretty(&lookup)?);
    }

    if save {
        let saved = foods::save_food(&store, lookup.food)?;
        println!("Saved {} ({})", saved.name, saved.id);
        println!("Database path: {}", config.database_path.display());
    }

    Ok(())
}

fn print_label(food: &FoodRecord) {
    let facts = &food.nutrition_facts;
    println!("{} ({})", food.name, food.barcode);
    println!("Serving: {} = {} g", food.serving_size, food.serving_size_grams);
    println!("{:<20} {:>10.1} {}", "Calories", facts.calories, NutrientUnit::Kilocalorie.as_str());
    for (nutrient, info) in facts.iter() {
        let pdv = info
            .percent_daily_value
            .map(|v| format!("{:.0}%", v))
            .unwrap_or_default();
        println!(
            "{:<20} {:>10.2} {:<4} {:>5}",
            nutrient.label(),
            info.amount,
            info.unit.as_str(),
            pdv
        );
    }
}
