use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// SHELF books service administration.
#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file, overrides `database.path` and `DB_PATH`
    #[arg(global = true, long)]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Apply schema migrations and exit
    Migrate,
    /// Apply migrations, then insert sample books into an empty store
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load SHELF settings")?;
    settings.apply_db_path_override(cli.db_path);
    shelf_telemetry::init(&settings.telemetry);

    match cli.command {
        Command::Serve => {
            let app = shelf_app::bootstrap(settings).await?;
            app.serve().await
        }
        Command::Migrate => {
            let db = shelf_db::connect(&settings.database).await?;
            shelf_app::migrate(&shelf_app::registry(&db), &db).await?;
            println!("migrations applied to {}", settings.database.path);
            Ok(())
        }
        Command::Seed => {
            let db = shelf_db::connect(&settings.database).await?;
            shelf_app::migrate(&shelf_app::registry(&db), &db).await?;
            let inserted = shelf_app::modules::books::seed::seed_if_empty(&db)
                .await
                .context("failed to seed books")?;
            println!("inserted {} sample books", inserted);
            Ok(())
        }
    }
}
