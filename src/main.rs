use clap::{Parser, Subcommand};
use std::process::ExitCode;
use user_service::{Config, build_rocket, db, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "user-service")]
#[command(version, about = "User CRUD service; serves HTTP when no command is given")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Database migration
    #[command(visible_alias = "m")]
    Migrate {
        /// Database connection string; defaults to the configured database url
        #[arg(short, long, env = "DB_CONN")]
        conn: Option<String>,
        #[command(subcommand)]
        direction: MigrateDirection,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum MigrateDirection {
    /// Apply every pending migration
    Up,
    /// Revert the most recently applied migration
    Down,
}

async fn migrate(config: &Config, conn: Option<String>, direction: MigrateDirection) -> ExitCode {
    let mut database = config.database.clone();
    if let Some(conn) = conn {
        database.url = conn;
    }

    let pool = match db::init_pool(&database).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "could not connect to the database");
            return ExitCode::FAILURE;
        }
    };

    let result = match direction {
        MigrateDirection::Up => db::migrate_up(&pool).await.map(|_| tracing::info!("migrations applied")),
        MigrateDirection::Down => db::migrate_down(&pool).await.map(|reverted| match reverted {
            Some(version) => tracing::info!(version, "migration reverted"),
            None => tracing::info!("no migration to revert"),
        }),
    };

    pool.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, ?direction, "migration failed");
            ExitCode::FAILURE
        }
    }
}

#[rocket::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting user-service");

    if let Some(Commands::Migrate { conn, direction }) = cli.command {
        return migrate(&config, conn, direction).await;
    }

    match build_rocket(config).launch().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server failed");
            ExitCode::FAILURE
        }
    }
}
