//! SQLite connection factory and migration runner for SHELF.

use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::SchemaManager;

use shelf_kernel::settings::DatabaseSettings;
use shelf_kernel::Migration;

const MEMORY_PATH: &str = ":memory:";

/// Build the SQLx connection URL for a configured database path.
///
/// File databases are opened read-write and created when missing.
pub fn database_url(path: &str) -> String {
    if path == MEMORY_PATH {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{}?mode=rwc", path)
    }
}

/// Open a connection pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let url = database_url(&settings.path);
    let mut options = ConnectOptions::new(url.clone());
    options.sqlx_logging(false);

    // Every pooled connection to `:memory:` would see its own empty database.
    if settings.path == MEMORY_PATH {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to open database at {}", url))?;

    tracing::info!(target: "shelf-db", path = %settings.path, "database connected");
    Ok(db)
}

/// Apply collected module migrations in order.
///
/// Migrations are expected to be additive and idempotent (`IF NOT EXISTS`),
/// so running them on every start is safe.
pub async fn migrate(
    db: &DatabaseConnection,
    migrations: Vec<(String, Migration)>,
) -> anyhow::Result<()> {
    let manager = SchemaManager::new(db);

    for (module, migration) in migrations {
        tracing::info!(
            target: "shelf-db",
            module = %module,
            migration = migration.name(),
            "applying migration"
        );

        migration.up(&manager).await.with_context(|| {
            format!(
                "migration '{}' of module '{}' failed",
                migration.name(),
                module
            )
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::prelude::*;

    #[derive(DeriveIden)]
    enum Widget {
        Table,
        Id,
        Label,
    }

    struct CreateWidget;

    impl MigrationName for CreateWidget {
        fn name(&self) -> &str {
            "m0001_create_widget"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for CreateWidget {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Widget::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Widget::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Widget::Label).string().not_null())
                        .to_owned(),
                )
                .await
        }
    }

    fn widget_migrations() -> Vec<(String, Migration)> {
        vec![("widgets".to_string(), Box::new(CreateWidget))]
    }

    #[test]
    fn memory_path_maps_to_sqlite_memory_url() {
        assert_eq!(database_url(":memory:"), "sqlite::memory:");
    }

    #[test]
    fn file_path_is_created_on_demand() {
        assert_eq!(database_url("books.db"), "sqlite://books.db?mode=rwc");
    }

    #[tokio::test]
    async fn migrations_create_tables_and_are_repeatable() {
        let db = connect(&DatabaseSettings::in_memory()).await.unwrap();

        migrate(&db, widget_migrations()).await.unwrap();
        migrate(&db, widget_migrations()).await.unwrap();

        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("widget").await.unwrap());
    }
}
