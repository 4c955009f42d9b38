use clap::{Parser, Subcommand};
use domain::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use domain::gateway::oauth::{self, AuthorizationOptions, ProviderKind};
use domain::login;
use dotenvy::dotenv;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

/// Operator tool for the OAuth login flow.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Start a login: store the referrer and print the provider authorization URL
    Begin {
        #[arg(long)]
        provider: ProviderKind,
        /// Page to return the user to once the login completes
        #[arg(long)]
        referrer: String,
    },
    /// Finish a login with the parameters of the provider's callback
    Complete {
        #[arg(long)]
        provider: ProviderKind,
        #[arg(long)]
        code: String,
        #[arg(long)]
        state: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    Logger::init_logger(&cli.config);

    info!("Connecting to database [{}]...", cli.config.database_url());

    let db = match service::init_database(&cli.config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(cli.config, &db);

    if let Err(e) = run(cli.command, &app_state).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, app_state: &AppState) -> Result<(), Error> {
    let db = app_state.db_conn_ref();

    match command {
        Command::Migrate => {
            Migrator::up(db, None).await.map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                    EntityErrorKind::DbTransaction,
                )),
            })?;
            info!("Migrations applied");
        }
        Command::Begin { provider, referrer } => {
            let registry = oauth::registry(&app_state.config)?;
            let provider = registry.get(provider)?;
            let redirect = login::begin(
                db,
                provider.as_ref(),
                &referrer,
                app_state.config.valid_redirect_url(),
                &AuthorizationOptions::default(),
            )
            .await?;

            println!("state: {}", redirect.state);
            println!("authorization_url: {}", redirect.authorization_url);
        }
        Command::Complete {
            provider,
            code,
            state,
        } => {
            let registry = oauth::registry(&app_state.config)?;
            let provider = registry.get(provider)?;
            let completed = login::complete(db, provider.as_ref(), &code, &state).await?;

            println!("username: {}", completed.profile.username);
            println!("referrer: {}", completed.referrer);
        }
    }

    Ok(())
}
