use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::cli::config::ClientSettings;
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;
use crate::config::{DEFAULT_AUDIENCE, DEFAULT_ISSUER};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a development token signed with a shared secret")]
    Token {
        #[arg(help = "Subject (user id) the token identifies")]
        subject: String,
        #[arg(long, help = "HS256 secret (defaults to AUTH_JWT_SECRET)")]
        secret: Option<String>,
        #[arg(long, help = "Issuer (defaults to AUTH_ISSUER)")]
        issuer: Option<String>,
        #[arg(long, help = "Audience (defaults to AUTH_AUDIENCE)")]
        audience: Option<String>,
        #[arg(long, default_value_t = 15, help = "Lifetime in minutes")]
        ttl_minutes: i64,
    },

    #[command(about = "Show the identity the server sees for TASKS_TOKEN")]
    Whoami,
}

fn env_or(value: Option<String>, name: &str, default: &str) -> String {
    value
        .or_else(|| std::env::var(name).ok())
        .unwrap_or_else(|| default.to_string())
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { subject, secret, issuer, audience, ttl_minutes } => {
            let secret = secret
                .or_else(|| std::env::var("AUTH_JWT_SECRET").ok())
                .ok_or_else(|| anyhow::anyhow!("No secret given; pass --secret or set AUTH_JWT_SECRET"))?;

            let claims = Claims::new(
                env_or(issuer, "AUTH_ISSUER", DEFAULT_ISSUER),
                env_or(audience, "AUTH_AUDIENCE", DEFAULT_AUDIENCE),
                subject,
                chrono::Duration::minutes(ttl_minutes),
            );
            let token = generate_jwt(&claims, &secret)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token generated",
                    Some(json!({ "token": token, "expires_at": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        AuthCommands::Whoami => {
            let api = ClientSettings::from_env().api()?;
            let identity: Value = api.get_json("/api/auth/whoami").await?;
            output_data(&output_format, &identity, || {
                format!(
                    "Subject: {}\nIssuer:  {}\n",
                    identity["subject"].as_str().unwrap_or("-"),
                    identity["issuer"].as_str().unwrap_or("-"),
                )
            })
        }
    }
}
