use anyhow::Result;
use article_gateway::{AppConfig, create_app};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "article-gateway")]
#[command(about = "Admin gateway for article upserts against Supabase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        #[arg(short, long, default_value = "8080", env = "PORT")]
        port: u16,
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
    /// Report which configuration values are present (never prints secrets)
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("article_gateway=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = AppConfig::from_env();
            let app = create_app(config);

            let addr = format!("{}:{}", bind, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Gateway listening on http://{}", addr);

            axum::serve(listener, app).await?;
        }
        Commands::CheckConfig => {
            let config = AppConfig::from_env();

            let presence = |set: bool| if set { "set" } else { "MISSING" };
            println!(
                "SUPABASE_URL           {}",
                config
                    .supabase_url
                    .as_deref()
                    .unwrap_or("MISSING")
            );
            println!(
                "SUPABASE_ANON_KEY      {}",
                presence(config.anon_key.is_some())
            );
            println!(
                "SUPABASE_SERVICE_ROLE  {}",
                presence(config.service_role_key.is_some())
            );

            if config.admin_credentials().is_some() {
                println!();
                println!("Upsert endpoint: enabled");
            } else {
                println!();
                println!("Upsert endpoint: DISABLED (will answer 500 Server misconfigured)");
            }
        }
    }

    Ok(())
}
