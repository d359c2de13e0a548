pub mod books;

use sea_orm::DatabaseConnection;
use shelf_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &DatabaseConnection) {
    registry.register(books::create_module(db.clone()));
}
