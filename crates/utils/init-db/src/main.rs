//! # Init DB Utility
//!
//! Creates the SQLite database file (and its directory) if missing and
//! applies the schema migrations. Safe to run more than once.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package init-db --bin init_db
//! ```
//!
//! `DATABASE_URL` is read from the environment or `.env`, defaulting to
//! `sqlite:instance/site.db`.

use lib_core::config::DEFAULT_DATABASE_URL;
use lib_core::model::store::{run_migrations, UserRepository};
use lib_core::{create_pool, prepare_sqlite_path};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = init_db().await {
        println!("An error occurred: {:#}", e);
        std::process::exit(1);
    }
}

async fn init_db() -> anyhow::Result<()> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    if let Some(dir) = prepare_sqlite_path(&database_url)? {
        println!("Created {}", dir.display());
    }

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;

    let users = UserRepository::count(&pool).await?;
    println!("Initialized the database.");
    println!("{} registered user(s).", users);

    Ok(())
}
