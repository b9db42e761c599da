use serde::Deserialize;
use tracing::warn;

/// Fallback used when JWT_SECRET is absent. Known weakness inherited from the
/// original deployment; kept so local setups boot, logged loudly at startup.
const DEV_JWT_SECRET: &str = "development_jwt_secret";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                warn!("JWT_SECRET not set; falling back to the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };
        let jwt = JwtConfig {
            secret,
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        Ok(Self { database_url, jwt })
    }
}
