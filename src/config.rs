use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

const DEFAULT_ORIGINS: &str = "http://127.0.0.1:8080,http://127.0.0.1:5173,http://localhost:5173,http://localhost:8080,https://studio.apollographql.com";

pub struct Config {
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub allowed_origins: Vec<String>,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub stripe_secret_key: String,
    pub paypal_client_id: String,
}

impl Config {
    pub fn load() -> Self {
        let origins: String = try_load("ALLOWED_ORIGINS", DEFAULT_ORIGINS);

        Self {
            port: try_load("RUST_PORT", "3000"),
            mongo_uri: try_load("MONGO_URI", "mongodb://localhost:27017"),
            mongo_db: try_load("MONGO_DB", "storefront"),
            allowed_origins: origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            access_token_secret: read_secret("ACCESS_TOKEN_SECRET"),
            refresh_token_secret: read_secret("REFRESH_TOKEN_SECRET"),
            stripe_secret_key: read_secret("STRIPE_SECRET_KEY"),
            paypal_client_id: read_secret("PAYPAL_CLIENT_ID"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> String {
    // env takes precedence so local runs do not need mounted secret files
    if let Ok(value) = env::var(secret_name) {
        return value;
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}
