use libcnb::Env;
use std::collections::BTreeMap;

pub(crate) const INSTANCE_ID: &str = "INSTANCE_ID";
pub(crate) const HEAP_MAX: &str = "HEAP_MAX";
pub(crate) const DIRECTMEMORY_MAX: &str = "DIRECTMEMORY_MAX";

/// Configuration keys the launch command is rendered from.
pub(crate) const CONSUMED_KEYS: [&str; 3] = [INSTANCE_ID, HEAP_MAX, DIRECTMEMORY_MAX];

/// Prefix of platform environment variables that override configuration keys.
pub(crate) const ENV_OVERRIDE_PREFIX: &str = "LOGPRESSO_";

/// Flat Logpresso configuration, merged from an ordered list of fragments.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct LogpressoConfig {
    values: BTreeMap<String, String>,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Configuration value of `{key}` must be a string, number, boolean or datetime")]
    NonScalarValue { key: String },
}

impl LogpressoConfig {
    /// Merges the given fragments into one configuration. Keys of later fragments replace the
    /// values of earlier ones.
    pub(crate) fn from_fragments<'a>(
        fragments: impl IntoIterator<Item = &'a toml::Table>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for fragment in fragments {
            for (key, value) in fragment {
                config.insert(key, render_scalar(key, value)?);
            }
        }

        Ok(config)
    }

    /// Applies `LOGPRESSO_<KEY>` variables of the platform environment for all consumed keys.
    #[must_use]
    pub(crate) fn with_env_overrides(mut self, env: &Env) -> Self {
        for key in CONSUMED_KEYS {
            if let Some(value) = env.get_string_lossy(format!("{ENV_OVERRIDE_PREFIX}{key}")) {
                self.insert(key, value);
            }
        }

        self
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Consumed keys without a value, in the order the launch command uses them.
    pub(crate) fn missing_keys(&self) -> Vec<&'static str> {
        CONSUMED_KEYS
            .into_iter()
            .filter(|key| !self.values.contains_key(*key))
            .collect()
    }
}

fn render_scalar(key: &str, value: &toml::Value) -> Result<String, ConfigError> {
    match value {
        toml::Value::String(string) => Ok(string.clone()),
        toml::Value::Integer(integer) => Ok(integer.to_string()),
        toml::Value::Float(float) => Ok(float.to_string()),
        toml::Value::Boolean(boolean) => Ok(boolean.to_string()),
        toml::Value::Datetime(datetime) => Ok(datetime.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => Err(ConfigError::NonScalarValue {
            key: key.to_string(),
        }),
    }
}
