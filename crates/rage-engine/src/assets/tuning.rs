use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a tuning override was refused.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Per-game constants loadable from a partial JSON override.
///
/// Implementors derive `Deserialize` with `#[serde(default)]` so a host may
/// override a single field and keep the rest.
pub trait Tunable: DeserializeOwned + Default {
    /// Reject values that would break geometry or timing.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Parse and validate a tuning override. Blank input yields the defaults.
pub fn parse_tuning<T: Tunable>(json: &str) -> Result<T, ConfigError> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    let tuning: T = serde_json::from_str(json)?;
    tuning.validate()?;
    Ok(tuning)
}

/// Fail with [`ConfigError::Invalid`] unless `ok` holds.
pub fn ensure(ok: bool, message: impl Into<String>) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Demo {
        width: f32,
        min_ticks: u32,
        max_ticks: u32,
    }

    impl Default for Demo {
        fn default() -> Self {
            Self { width: 120.0, min_ticks: 480, max_ticks: 720 }
        }
    }

    impl Tunable for Demo {
        fn validate(&self) -> Result<(), ConfigError> {
            ensure(self.width > 0.0, "width must be positive")?;
            ensure(self.min_ticks <= self.max_ticks, "interval bounds are inverted")
        }
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let demo: Demo = parse_tuning(r#"{ "width": 90.0 }"#).unwrap();
        assert_eq!(demo, Demo { width: 90.0, ..Demo::default() });
    }

    #[test]
    fn blank_input_is_default() {
        let demo: Demo = parse_tuning("  ").unwrap();
        assert_eq!(demo, Demo::default());
    }

    #[test]
    fn rejects_bad_values() {
        let err = parse_tuning::<Demo>(r#"{ "min_ticks": 900 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {:?}", err);
        let err = parse_tuning::<Demo>("{ width: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {:?}", err);
    }
}
