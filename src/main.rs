use std::net::SocketAddr;
use std::sync::Arc;

use serde::Deserialize;
use tokio::fs;

use versiontrack::routes::{self, AppState};
use versiontrack::store::Store;

// sha256 of the well-known default password; override via config or env.
const DEFAULT_PASSWORD_HASH: &str =
    "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

#[derive(Deserialize, Clone, Debug)]
struct Config {
    server: ServerConfig,
    #[serde(default)]
    database: DatabaseConfig,
    #[serde(default)]
    auth: AuthConfig,
}

#[derive(Deserialize, Clone, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
}

#[derive(Deserialize, Clone, Debug)]
struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "versiontrack.db".to_string()
}

#[derive(Deserialize, Clone, Debug)]
struct AuthConfig {
    #[serde(default = "default_password_hash")]
    password_hash: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_hash: default_password_hash(),
        }
    }
}

fn default_password_hash() -> String {
    DEFAULT_PASSWORD_HASH.to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
 __      __           _          _______             _
 \ \    / /          (_)        |__   __|           | |
  \ \  / /__ _ __ ___ _  ___  _ __ | |_ __ __ _  ___| | __
   \ \/ / _ \ '__/ __| |/ _ \| '_ \| | '__/ _` |/ __| |/ /
    \  /  __/ |  \__ \ | (_) | | | | | | | (_| | (__|   <
     \/ \___|_|  |___/_|\___/|_| |_|_|_|  \__,_|\___|_|\_\
"#
    );

    tracing_subscriber::fmt::init();

    // Load configuration
    let config_str = match fs::read_to_string("versiontrack.toml").await {
        Ok(s) => s,
        Err(_) => {
            eprintln!("Configuration file 'versiontrack.toml' not found. Creating default.");
            let default_config = r#"
[server]
host = "0.0.0.0"
port = 3000

[database]
path = "versiontrack.db"

# [auth]
# password_hash = "<hex sha256 of the shared password>"
"#;
            fs::write("versiontrack.toml", default_config).await?;
            default_config.to_string()
        }
    };

    let config: Config = toml::from_str(&config_str)?;
    let password_hash = std::env::var("VERSIONTRACK_PASSWORD_HASH")
        .unwrap_or_else(|_| config.auth.password_hash.clone());

    let store = Store::open(&config.database.path).await?;
    tracing::info!(path = %config.database.path, "database ready");

    let state = Arc::new(AppState {
        store,
        password_hash,
    });
    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    println!("VersionTrack listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
