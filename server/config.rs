use thiserror::Error;

/// Startup settings for the digit server, read from the environment.
///
/// | variable          | default                     |
/// |-------------------|-----------------------------|
/// | `DIGITS_ADDR`     | `127.0.0.1:5000`            |
/// | `DIGITS_MODEL`    | `trained_models/mnist.json` |
/// | `DIGITS_STRICT`   | `false`                     |
/// | `DIGITS_MAX_BODY` | `8388608` (bytes)           |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr:           String,
    pub model_path:     String,
    /// Reject images that are not 28×28 instead of resizing them.
    pub strict:         bool,
    pub max_body_bytes: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be true/false/1/0, got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidSize { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr:           "127.0.0.1:5000".to_owned(),
            model_path:     "trained_models/mnist.json".to_owned(),
            strict:         false,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source; unset variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(addr) = lookup("DIGITS_ADDR") {
            config.addr = non_empty("DIGITS_ADDR", addr)?;
        }
        if let Some(path) = lookup("DIGITS_MODEL") {
            config.model_path = non_empty("DIGITS_MODEL", path)?;
        }
        if let Some(raw) = lookup("DIGITS_STRICT") {
            config.strict = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::InvalidBool { var: "DIGITS_STRICT", value: raw }),
            };
        }
        if let Some(raw) = lookup("DIGITS_MAX_BODY") {
            config.max_body_bytes = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidSize { var: "DIGITS_MAX_BODY", value: raw }),
            };
        }

        Ok(config)
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty { var })
    } else {
        Ok(value.trim().to_owned())
    }
}
