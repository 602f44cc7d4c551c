use clap::{Parser, Subcommand};
use serde_json::json;

use crate::auth::{UserClaim, MAX_TOKEN_TTL_MINUTES};
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "ideas-api")]
#[command(about = "Ideas API - REST backend for user-submitted ideas")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listening port (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Sign an access token for a user id with the configured secret")]
    Token {
        #[arg(long, help = "User id to embed in the token")]
        user: String,
        #[arg(
            long,
            value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_MINUTES),
            help = "Token lifetime in minutes (defaults to JWT_EXPIRY_MINUTES)"
        )]
        ttl_minutes: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            crate::server::run(config).await
        }
        Commands::Token { user, ttl_minutes } => {
            let issued = issue_token(&config, &user, ttl_minutes)?;
            match output_format {
                OutputFormat::Text => println!("{}", issued.token),
                OutputFormat::Json => println!(
                    "{}",
                    json!({
                        "token": issued.token,
                        "user": user,
                        "expires_in": issued.ttl.num_seconds()
                    })
                ),
            }
            Ok(())
        }
    }
}

/// A signed token and the lifetime it was issued with
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub ttl: chrono::Duration,
}

/// Sign a token for `user`, using the configured lifetime unless one is given
pub fn issue_token(
    config: &AppConfig,
    user: &str,
    ttl_minutes: Option<i64>,
) -> anyhow::Result<IssuedToken> {
    if user.trim().is_empty() {
        anyhow::bail!("user id must not be empty");
    }

    let codec = crate::server::token_codec(config)?;
    let ttl = match ttl_minutes {
        Some(minutes) if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) => anyhow::bail!(
            "ttl must be between 1 and {} minutes, got {}",
            MAX_TOKEN_TTL_MINUTES,
            minutes
        ),
        Some(minutes) => chrono::Duration::minutes(minutes),
        None => codec.default_ttl(),
    };

    let token = codec.sign_with_ttl(&UserClaim { id: user.to_string() }, ttl)?;
    Ok(IssuedToken { token, ttl })
}
