use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use uuid::Uuid;

use mydesk::cli::{create_user, issue_token, migrate};
use mydesk::mydesk_config::AppConfig;
use mydesk::mydesk_db::{PgStore, init_db_pool};
use mydesk::mydesk_models::ids::UserId;
use mydesk::mydesk_models::users::CreateUserDto;

#[derive(Parser)]
#[command(name = "mydesk-cli")]
#[command(about = "MyDesk CLI - Administrative tools for MyDesk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Insert a user account
    CreateUser {
        #[arg(short = 'e', long)]
        email: String,

        #[arg(short = 'f', long)]
        first_name: String,

        #[arg(short = 'l', long)]
        last_name: String,
    },
    /// Print a development access token for a user
    IssueToken {
        #[arg(short = 'u', long)]
        user_id: Uuid,

        #[arg(short = 'e', long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Migrate => {
            let pool = connect(&config).await?;
            migrate(&pool).await.map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("✅ Migrations applied");
        }
        Commands::CreateUser {
            email,
            first_name,
            last_name,
        } => {
            let store = PgStore::new(connect(&config).await?);
            let dto = CreateUserDto {
                email,
                first_name,
                last_name,
            };
            let user = create_user(&store, dto)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("✅ User created successfully!");
            println!("   ID: {}", user.id);
            println!("   Email: {}", user.email);
            println!("   Name: {} {}", user.first_name, user.last_name);
        }
        Commands::IssueToken { user_id, email } => {
            let token = issue_token(UserId::from_uuid(user_id), &email, &config.jwt)
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("{token}");
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<mydesk::mydesk_db::PgPool> {
    let database_url = config
        .server
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    Ok(init_db_pool(database_url, config.server.database_max_connections).await?)
}
