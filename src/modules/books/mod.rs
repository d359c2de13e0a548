pub mod error;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod seed;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use sea_orm::DatabaseConnection;
use shelf_kernel::{InitCtx, Migration, Module};

use service::BookService;

/// Books module: the `/books` resource and its table
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            service: BookService::new(db),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::document())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Box::new(migration::CreateBooks)]
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.database.seed {
            seed::seed_if_empty(ctx.db).await?;
        }
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: DatabaseConnection) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}
