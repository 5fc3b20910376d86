//! firenze - command-line client for the Imobiliária Firenze portal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use firenze_portal::auth::SessionState;
use firenze_portal::{Portal, PortalConfig, PortalError};
use tracing_subscriber::EnvFilter;

/// firenze - Imobiliária Firenze portal client
#[derive(Parser, Debug)]
#[command(name = "firenze")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and FIRENZE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Session ===
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,

        /// Prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Prompted (with confirmation) when omitted
        #[arg(long)]
        password: Option<String>,

        #[arg(long, requires = "password")]
        confirm_password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the current session
    Whoami,

    /// Check the stored token with the backend
    Verify,

    // === Navigation ===
    /// Resolve where a portal path leads for the current session
    Open {
        /// Portal path, e.g. /admin
        path: String,
    },

    // === Data ===
    /// List properties
    Properties,

    /// List notifications
    Notifications {
        /// Only notifications addressed to this user
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Show backend status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = PortalConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    let portal = Portal::start(config).await.context("Failed to start portal client")?;

    let outcome = run(&portal, cli.command).await;
    if let Err(e) = &outcome {
        if e.downcast_ref::<PortalError>().is_some_and(PortalError::requires_login) {
            eprintln!("Session expired, redirected to {}", portal.location());
        }
    }
    outcome
}

async fn run(portal: &Portal, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .interact()
                    .context("Failed to read password")?,
            };
            let identity = portal.login(&email, &password).await?;
            println!("Logged in as {} ({})", identity.name, identity.role);
            println!("{}", portal.location());
        }

        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let (password, confirm) = match (password, confirm_password) {
                (Some(p), Some(c)) => (p, c),
                (Some(p), None) => {
                    let c = dialoguer::Password::new()
                        .with_prompt("Confirm password")
                        .interact()
                        .context("Failed to read password")?;
                    (p, c)
                }
                _ => {
                    let p = dialoguer::Password::new()
                        .with_prompt("Password")
                        .interact()
                        .context("Failed to read password")?;
                    let c = dialoguer::Password::new()
                        .with_prompt("Confirm password")
                        .interact()
                        .context("Failed to read password")?;
                    (p, c)
                }
            };
            portal.register(&name, &email, &password, &confirm).await?;
            println!("Account created. Log in with: firenze login --email {email}");
        }

        Commands::Logout => {
            portal.logout();
            println!("Logged out");
        }

        Commands::Whoami => match portal.state() {
            SessionState::Authenticated(id) => {
                println!("{} <{}> {} (id {})", id.name, id.email, id.role, id.id);
            }
            _ => println!("Not logged in"),
        },

        Commands::Verify => match portal.verify().await {
            Ok(true) => println!("Session valid"),
            Ok(false) => println!("Not logged in"),
            Err(e) => return Err(e.into()),
        },

        Commands::Open { path } => {
            println!("{}", portal.navigate(&path));
        }

        Commands::Properties => {
            let list = portal.properties().list().await?;
            if list.is_empty() {
                println!("No properties listed");
            }
            for p in list {
                println!(
                    "{} bloco {} apto {}  {}  {:.1} m²  R$ {:.2}  {}",
                    p.id.as_deref().unwrap_or("-"),
                    p.bloco,
                    p.apartamento,
                    p.configuracao_planta,
                    p.area_util,
                    p.preco,
                    p.status_anuncio
                );
            }
        }

        Commands::Notifications { user_id } => {
            let list = portal.notifications().list(user_id.as_deref()).await?;
            for n in list {
                let mark = if n.lida { ' ' } else { '*' };
                println!("{mark} [{:?}] {}: {}", n.tipo, n.titulo, n.mensagem);
            }
        }

        Commands::Status => {
            let status = portal.status().check().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
