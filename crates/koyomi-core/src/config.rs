use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::weekday::Weekday;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Default IANA zone for new calendar values when the caller does not
    /// name one.
    pub timezone: String,
    /// Which weekday starts the week in grids and week indexing.
    pub first_day_of_week: Weekday,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into
    /// a `Settings`. Environment variables take precedence over `.env`
    /// file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it
    /// fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("calendar.timezone", "UTC")?
            .set_default("calendar.first_day_of_week", "sunday")?
            .set_default("logging.level", "info")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("koyomi.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
