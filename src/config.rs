use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
}

pub const DEFAULT_PORT: u16 = 7171;

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("MONTHKEEP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("MONTHKEEP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_path: env::var("MONTHKEEP_DATABASE_URL")
                .map(|v| database_path_from_url(&v))
                .unwrap_or_else(|_| PathBuf::from("data/monthkeep.db")),
            migrations_path: env::var("MONTHKEEP_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accepts both bare paths and `sqlite://` style URLs.
fn database_path_from_url(value: &str) -> PathBuf {
    PathBuf::from(
        value
            .strip_prefix("sqlite://")
            .or_else(|| value.strip_prefix("sqlite:"))
            .unwrap_or(value),
    )
}
