use crate::error::{Error, Result};
use crate::sequencer::TimingConfig;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub sample_cap: usize,
    pub image_set_size: usize,
    pub admin: AdminSeed,
    pub seed_default_content: bool,
    pub legacy_data_dir: Option<PathBuf>,
    pub json_logs: bool,
    pub timing: TimingConfig,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let timing = TimingConfig {
            tat_display_seconds: get_env_parse_or("TAT_DISPLAY_SECONDS", 30)?,
            tat_gap_seconds: get_env_parse_or("TAT_GAP_SECONDS", 240)?,
            wat_display_seconds: get_env_parse_or("WAT_DISPLAY_SECONDS", 15)?,
            srt_display_seconds: get_env_parse_or("SRT_DISPLAY_SECONDS", 30)?,
            sdt_total_seconds: get_env_parse_or("SDT_TOTAL_SECONDS", 15 * 60)?,
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:5000"),
            database_url: get_env_or("DATABASE_URL", "sqlite://data/assessment.db"),
            uploads_dir: PathBuf::from(get_env_or("UPLOADS_DIR", "./uploads")),
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            sample_cap: get_env_parse_or("SAMPLE_CAP", 60)?,
            image_set_size: get_env_parse_or("IMAGE_SET_SIZE", 11)?,
            admin: AdminSeed {
                username: get_env_or("ADMIN_USERNAME", "admin"),
                email: get_env("ADMIN_EMAIL")?,
                password: get_env("ADMIN_PASSWORD")?,
            },
            seed_default_content: get_env_parse_or("SEED_DEFAULT_CONTENT", true)?,
            legacy_data_dir: env::var("LEGACY_DATA_DIR").ok().map(PathBuf::from),
            json_logs: get_env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
            timing,
        })
    }

    pub fn images_dir(&self) -> PathBuf {
        self.uploads_dir.join("images")
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
