//! `hotel-manager` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`                 start the API server.
//! - `migrate`               run pending database migrations.
//! - `create-superadmin`     create the first platform account.
//! - `expire-subscriptions`  mark subscriptions past their end date expired.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use db::models::NewUser;
use db::repository::{subscriptions as subscription_repo, users as user_repo};
use domain::Role;

#[derive(Parser)]
#[command(
    name = "hotel-manager",
    about = "Multi-tenant hotel management backend",
    version
)]
struct Cli {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DatabaseArgs {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://hotel-manager.db", global = true)]
    database_url: String,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10, global = true)]
    max_connections: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
        bind: String,

        /// Secret used to sign access tokens.
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        jwt_secret: String,

        #[arg(long, env = "JWT_TTL_HOURS", default_value_t = 24)]
        jwt_ttl_hours: i64,
    },
    /// Run pending database migrations.
    Migrate,
    /// Create a platform super administrator.
    CreateSuperadmin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SUPERADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "Platform")]
        first_name: String,
        #[arg(long, default_value = "Admin")]
        last_name: String,
    },
    /// Expire active subscriptions whose end date has passed.
    ExpireSubscriptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let pool = db::pool::create_pool(&cli.database.database_url, cli.database.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", cli.database.database_url))?;

    match cli.command {
        Command::Serve {
            bind,
            jwt_secret,
            jwt_ttl_hours,
        } => {
            if jwt_secret.len() < 16 {
                bail!("JWT_SECRET must be at least 16 characters");
            }
            db::pool::run_migrations(&pool).await.context("migration failed")?;
            info!("Starting API server on {bind}");
            api::serve(&bind, pool, api::ApiConfig::new(jwt_secret, jwt_ttl_hours))
                .await
                .context("API server stopped")?;
        }
        Command::Migrate => {
            info!("Running migrations against {}", cli.database.database_url);
            db::pool::run_migrations(&pool).await.context("migration failed")?;
            info!("Migrations applied successfully");
        }
        Command::CreateSuperadmin {
            email,
            password,
            first_name,
            last_name,
        } => {
            if password.len() < 8 {
                bail!("password must be at least 8 characters");
            }
            db::pool::run_migrations(&pool).await.context("migration failed")?;
            let password_hash =
                api::auth::hash_password(&password).context("password hashing failed")?;
            let user = user_repo::create_user(
                &pool,
                &NewUser {
                    hotel_id: None,
                    first_name,
                    last_name,
                    email,
                    phone: None,
                    password_hash,
                    role: Role::SuperAdmin.to_string(),
                    position: None,
                },
            )
            .await
            .context("could not create superadmin")?;
            info!(user_id = %user.id, email = %user.email, "superadmin created");
        }
        Command::ExpireSubscriptions => {
            let today = chrono::Utc::now().date_naive();
            let expired = subscription_repo::expire_overdue(&pool, today).await?;
            info!("{expired} subscription(s) expired");
        }
    }

    Ok(())
}
