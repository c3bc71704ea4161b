use crate::{
    api,
    auth::{CookieConfig, SessionCodec},
    store::PgStore,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;
use url::Url;

const PRODUCTION: &str = "production";

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub session_secret: SecretString,
    pub session_max_age: i64,
    pub environment: String,
}

impl Args {
    /// Session cookies are only marked `Secure` in production.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let cookie = CookieConfig::new()
        .with_max_age_seconds(args.session_max_age)
        .with_secure(args.is_production());
    let codec = SessionCodec::new(args.session_secret.clone(), cookie)?;

    log_startup_args(&args, &codec);

    let store = PgStore::connect(&args.dsn)
        .await
        .with_context(|| format!("Failed to connect to {}", redact_dsn(&args.dsn)))?;

    api::new(args.port, Arc::new(store), Arc::new(codec)).await
}

fn log_startup_args(args: &Args, codec: &SessionCodec) {
    let cookie = codec.cookie_config();
    info!(
        port = args.port,
        dsn = %redact_dsn(&args.dsn),
        environment = %args.environment,
        session_max_age = cookie.max_age_seconds(),
        secure_cookie = cookie.secure(),
        "Startup configuration"
    );
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}
