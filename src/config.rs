use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::Flavor;
use crate::flows::SecondaryFailurePolicy;
use crate::models::Credentials;

#[derive(Parser, Debug)]
#[command(name = "photoview", about = "Client for the Photo Views photo-sharing service")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the API server
    #[arg(long)]
    pub api_url: Option<String>,

    /// Backend flavor
    #[arg(long, value_enum)]
    pub flavor: Option<Flavor>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in with e-mail and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with the configured guest account
    Guest,
    /// Create a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Forget the stored session
    Logout,
    /// Show all posts, newest first
    Feed,
    /// Show my profile
    Whoami,
    /// Publish a photo
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        image: PathBuf,
    },
    /// Comment on a post
    Comment {
        #[arg(long)]
        post: u64,
        #[arg(long)]
        text: String,
    },
    /// Toggle my like on a post
    Like {
        #[arg(long)]
        post: u64,
    },
    /// Change nickname and optionally avatar
    Profile {
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub guest: GuestConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub flavor: Flavor,
    pub method_override: bool,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GuestConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct BootstrapConfig {
    pub secondary_failures: SecondaryFailurePolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            flavor: Flavor::Laravel,
            method_override: true,
            timeout_secs: 30,
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
        if let Some(ref url) = cli.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(flavor) = cli.flavor {
            config.api.flavor = flavor;
        }

        if config.storage.path.is_none() {
            config.storage.path = Some(data_dir.join("photoview.db"));
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".photoview")
        })
    }

    /// Guest account, only when both halves are configured.
    pub fn guest_credentials(&self) -> Option<Credentials> {
        match (&self.guest.email, &self.guest.password) {
            (Some(email), Some(password)) => Some(Credentials {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    pub fn db_path(&self) -> &Path {
        self.storage
            .path
            .as_deref()
            .unwrap_or_else(|| Path::new("photoview.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(data_dir: Option<PathBuf>) -> Cli {
        Cli {
            config: None,
            data_dir,
            api_url: None,
            flavor: None,
            command: Command::Feed,
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.flavor, Flavor::Laravel);
        assert!(config.api.method_override);
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.storage.path.is_none());
        assert!(config.guest_credentials().is_none());
        assert_eq!(
            config.bootstrap.secondary_failures,
            SecondaryFailurePolicy::BestEffort
        );
    }

    #[test]
    fn data_dir_uses_cli_override() {
        let cli = cli(Some(PathBuf::from("/tmp/test-photoview")));
        assert_eq!(Config::data_dir(&cli), PathBuf::from("/tmp/test-photoview"));
    }

    #[test]
    fn data_dir_defaults_to_dot_photoview() {
        assert!(Config::data_dir(&cli(None)).ends_with(".photoview"));
    }

    #[test]
    fn load_with_no_config_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&cli(Some(tmp.path().to_path_buf()))).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.db_path(), tmp.path().join("photoview.db"));
    }

    #[test]
    fn load_reads_toml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[api]
base_url = "https://photos.example.com"
flavor = "django"
method_override = false

[guest]
email = "guest@example.com"
password = "guestpass1"

[bootstrap]
secondary_failures = "fail_fast"
"#,
        )
        .unwrap();

        let mut cli = cli(Some(tmp.path().to_path_buf()));
        cli.config = Some(config_path);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.api.base_url, "https://photos.example.com");
        assert_eq!(config.api.flavor, Flavor::Django);
        assert!(!config.api.method_override);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.guest.email.as_deref(), Some("guest@example.com"));
        assert_eq!(
            config.guest_credentials().map(|c| c.password),
            Some("guestpass1".to_string())
        );
        assert_eq!(
            config.bootstrap.secondary_failures,
            SecondaryFailurePolicy::FailFast
        );
    }

    #[test]
    fn cli_overrides_beat_toml_values() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[api]
base_url = "https://photos.example.com"
"#,
        )
        .unwrap();

        let mut cli = cli(Some(tmp.path().to_path_buf()));
        cli.config = Some(config_path);
        cli.api_url = Some("http://127.0.0.1:9000".to_string());
        cli.flavor = Some(Flavor::Django);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.flavor, Flavor::Django);
    }

    #[test]
    fn cli_parses_subcommand() {
        let cli = Cli::parse_from([
            "photoview",
            "--api-url",
            "http://x",
            "comment",
            "--post",
            "4",
            "--text",
            "nice",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
        assert_eq!(
            cli.command,
            Command::Comment {
                post: 4,
                text: "nice".into()
            }
        );
    }
}
