use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spice-heritage", about = "Restaurant website and admin dashboard")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub restaurant: RestaurantConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
    pub max_upload_mb: usize,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub session_hours: u64,
}

/// Contact details shown on the public site.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RestaurantConfig {
    pub name: String,
    pub tagline: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub region: String,
    pub hours: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_upload_mb: 10,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "spice_session".to_string(),
            session_hours: 720,
        }
    }
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            name: "Spice Heritage".to_string(),
            tagline: "Authentic Indian Cuisine Since 1995".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: "info@spiceheritage.com".to_string(),
            address: "123 Heritage Street, Mumbai".to_string(),
            region: "Maharashtra, India 400001".to_string(),
            hours: "11:00 AM - 10:30 PM".to_string(),
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }

        config.resolve_paths(&data_dir);
        Ok(config)
    }

    /// Fill unset database/storage paths relative to the data directory.
    pub fn resolve_paths(&mut self, data_dir: &std::path::Path) {
        if self.database.path.is_none() {
            self.database.path = Some(data_dir.join("spice-heritage.db"));
        }
        if self.storage.path.is_none() {
            self.storage.path = Some(data_dir.join("uploads"));
        }
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".spice-heritage")
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("spice-heritage.db"))
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("uploads"))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.storage.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(dir: &std::path::Path) -> Cli {
        Cli {
            config: None,
            host: None,
            port: None,
            data_dir: Some(dir.to_path_buf()),
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.cookie_name, "spice_session");
        assert_eq!(config.auth.session_hours, 720);
        assert_eq!(config.storage.max_upload_mb, 10);
        assert_eq!(config.restaurant.name, "Spice Heritage");
        assert!(config.database.path.is_none());
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn data_dir_uses_cli_override() {
        let cli = cli_for(std::path::Path::new("/tmp/test-spice"));
        assert_eq!(Config::data_dir(&cli), PathBuf::from("/tmp/test-spice"));
    }

    #[test]
    fn data_dir_defaults_to_dot_spice_heritage() {
        let cli = Cli {
            config: None,
            host: None,
            port: None,
            data_dir: None,
        };
        assert!(Config::data_dir(&cli).ends_with(".spice-heritage"));
    }

    #[test]
    fn load_with_no_config_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&cli_for(tmp.path())).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.db_path(), tmp.path().join("spice-heritage.db"));
        assert_eq!(config.uploads_path(), tmp.path().join("uploads"));
        assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn huge_upload_limit_saturates() {
        let mut config = Config::default();
        config.storage.max_upload_mb = usize::MAX;
        assert_eq!(config.max_upload_bytes(), usize::MAX);
    }

    #[test]
    fn load_reads_toml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[storage]
max_upload_mb = 2

[restaurant]
name = "Curry House"
phone = "+44 20 0000 0000"
"#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(config_path),
            ..cli_for(tmp.path())
        };
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.max_upload_mb, 2);
        assert_eq!(config.restaurant.name, "Curry House");
        assert_eq!(config.restaurant.phone, "+44 20 0000 0000");
        // Unset keys keep their defaults
        assert_eq!(config.restaurant.email, "info@spiceheritage.com");
    }

    #[test]
    fn cli_overrides_beat_toml_values() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[server]\nhost = \"192.168.1.1\"\nport = 9000\n").unwrap();

        let cli = Cli {
            config: Some(config_path),
            host: Some("10.0.0.1".to_string()),
            port: Some(4000),
            data_dir: Some(tmp.path().to_path_buf()),
        };
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 4000);
    }
}
