use derive_more::derive::From;
use serde::de::DeserializeOwned;

mod demo;

pub use demo::DemoConfig;

#[derive(Debug, From)]
pub enum ConfigError {
    #[from(ignore)]
    IOError(std::io::Error),

    #[from(ignore)]
    DeserializationFailed(toml::de::Error),

    InvalidPath(std::path::PathBuf),

    #[from(ignore)]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::DeserializationFailed(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Reads the file at `target` and deserializes it as TOML into `T`.
///
/// # Errors
///
/// [`ConfigError::InvalidPath`] when the path is not a file, otherwise the
/// underlying io or toml failure.
pub fn from_path<T, V>(target: V) -> ConfigResult<T>
where
    T: DeserializeOwned,
    V: Into<std::path::PathBuf>,
{
    let target_path = target.into();
    if !target_path.is_file() {
        return Err(ConfigError::InvalidPath(target_path));
    }

    let config_content = std::fs::read_to_string(target_path)?;
    from_toml_str(&config_content)
}

pub fn from_toml_str<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config_obj: T = toml::from_str(content)?;
    Ok(config_obj)
}
