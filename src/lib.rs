use config::Config;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub mod app;
pub mod cli;
pub mod display;
pub mod error;
pub mod manager;
pub mod models;
pub mod qr;
pub mod schema;

pub use crate::error::AttendanceError;
use crate::manager::AttendanceManager;

/// Where the database lives when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "attendance.db";

/// Where student QR codes are written when nothing else is configured.
pub const DEFAULT_QR_DIR: &str = "qrcodes";

/// Runtime settings, read from the `[attendance_manager]` table of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub qr_dir: PathBuf,
}

/// Loads [`Settings`] from `config.toml` (optional), then applies the `DATABASE_URL` and
/// `QR_CODE_DIR` environment variables, which may also come from a `.env` file.
pub fn load_settings() -> Result<Settings, AttendanceError> {
    dotenv().ok();

    settings_from(
        "config",
        env::var("DATABASE_URL").ok(),
        env::var("QR_CODE_DIR").ok(),
    )
}

/// Builds [`Settings`] from the config file `config_name` (any extension `config` understands,
/// may be missing), with the given overrides taking precedence.
pub fn settings_from(
    config_name: &str,
    database_url: Option<String>,
    qr_dir: Option<String>,
) -> Result<Settings, AttendanceError> {
    let mut builder = Config::builder()
        .set_default("attendance_manager.database_url", DEFAULT_DATABASE_URL)?
        .set_default("attendance_manager.qr_dir", DEFAULT_QR_DIR)?
        .add_source(config::File::with_name(config_name).required(false));

    if let Some(database_url) = database_url {
        builder = builder.set_override("attendance_manager.database_url", database_url)?;
    }
    if let Some(qr_dir) = qr_dir {
        builder = builder.set_override("attendance_manager.qr_dir", qr_dir)?;
    }

    let settings = builder.build()?;
    Ok(settings.get::<Settings>("attendance_manager")?)
}

pub fn create_default_manager() -> Result<AttendanceManager, AttendanceError> {
    let settings = load_settings()?;
    log::debug!("using settings {settings:?}");

    AttendanceManager::open(&settings.database_url, settings.qr_dir)
}
