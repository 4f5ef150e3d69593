//! Bookshelf application library
//!
//! Wires the project modules into the kernel and runs the HTTP server.

pub mod modules;

use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Connect to the database, register modules and apply their schema.
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<(Database, ModuleRegistry)> {
    let db = Database::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("failed to open database")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);

    let ctx = InitCtx {
        settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    registry.apply_migrations(&db).await?;

    Ok((db, registry))
}

/// Run the service until a shutdown signal arrives.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let (db, registry) = bootstrap(settings).await?;
    let ctx = InitCtx {
        settings,
        db: &db,
    };

    registry.start_modules(&ctx).await?;
    let served = bookshelf_http::start_server(&registry, settings).await;
    registry.stop_modules().await?;
    db.close().await;

    served
}
