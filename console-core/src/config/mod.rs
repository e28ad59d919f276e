use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Name of the required settings file inside a configuration directory.
pub const BASE_FILE: &str = "base.yaml";

/// Name of the optional, untracked override file.
pub const LOCAL_FILE: &str = "local.yaml";

/// Load layered settings for a binary.
///
/// Sources, lowest precedence first: `<dir>/base.yaml`, `<dir>/local.yaml`
/// (optional), then `APP_`-prefixed environment variables with `__` as the
/// nesting separator (`APP_API__BASE_URL` sets `api.base_url`).
pub fn load_settings<T: DeserializeOwned>(
    configuration_directory: &Path,
) -> Result<T, config::ConfigError> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join(BASE_FILE)).required(true))
        .add_source(File::from(configuration_directory.join(LOCAL_FILE)).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<T>()
}
