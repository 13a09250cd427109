use serde::Deserialize;
use std::path::PathBuf;

/// Runtime settings, read from the process environment.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

/// Where the task table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Memory,
    File(PathBuf),
}

impl Config {
    /// Loads configuration from environment variables (`PORT`, `DATABASE_PATH`,
    /// `APP_ENV`, `STATIC_DIR`).
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Settings for running inside a test harness: in-memory store, no listener.
    pub fn for_tests() -> Self {
        Self {
            port: default_port(),
            database_path: default_database_path(),
            app_env: "test".to_string(),
            static_dir: default_static_dir(),
        }
    }

    pub fn is_test(&self) -> bool {
        self.app_env == "test"
    }

    pub fn storage(&self) -> Storage {
        if self.is_test() {
            Storage::Memory
        } else {
            Storage::File(self.database_path.clone())
        }
    }
}

fn default_port() -> u16 {
    5000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("todos.db")
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend/dist")
}
