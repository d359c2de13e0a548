//! SHELF application library
//!
//! Wires the books module into the kernel registry, applies migrations, and
//! exposes the assembled HTTP router.

pub mod modules;

use anyhow::Context;
use axum::Router;
use sea_orm::DatabaseConnection;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// A fully initialized application: migrated, started, ready to serve.
pub struct Application {
    pub settings: Settings,
    pub db: DatabaseConnection,
    pub registry: ModuleRegistry,
}

/// Build the module registry over an existing connection.
pub fn registry(db: &DatabaseConnection) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db);
    registry
}

/// Apply every module's migrations.
pub async fn migrate(registry: &ModuleRegistry, db: &DatabaseConnection) -> anyhow::Result<()> {
    shelf_db::migrate(db, registry.collect_migrations())
        .await
        .context("failed to apply migrations")
}

/// Connect, initialize modules, migrate, and start modules.
pub async fn bootstrap(settings: Settings) -> anyhow::Result<Application> {
    let db = shelf_db::connect(&settings.database).await?;
    let registry = registry(&db);

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    migrate(&registry, &db).await?;
    registry.start_modules(&ctx).await?;

    Ok(Application {
        settings,
        db,
        registry,
    })
}

impl Application {
    /// The HTTP router for this application.
    pub fn router(&self) -> Router {
        shelf_http::build_router(&self.registry, &self.settings)
    }

    /// Serve until shutdown, then stop modules.
    pub async fn serve(self) -> anyhow::Result<()> {
        let served = shelf_http::start_server(&self.registry, &self.settings).await;
        self.registry.stop_modules().await?;
        self.db.close().await.context("failed to close database")?;
        served
    }
}
