//! Strongly typed configuration schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings applied by a tool registry.
///
/// Both flags accept JSON booleans as well as `1`/`0`, `yes`/`no` and
/// `on`/`off` in either numeric or string form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Describe undocumented tools as ``Call function `name` `` instead of
    /// leaving the description empty.
    #[serde(deserialize_with = "flag::deserialize")]
    pub fallback_description: bool,
    /// Emit `title` keys in generated parameter schemas.
    #[serde(deserialize_with = "flag::deserialize")]
    pub schema_titles: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fallback_description: false,
            schema_titles: true,
        }
    }
}

/// Connection settings for a chat-completions compatible model API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEndpoint {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Base URL of the API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
}

impl fmt::Debug for ModelEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEndpoint")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Lenient boolean used by flag-like settings.
pub(crate) mod flag {
    use std::fmt;

    use serde::de::{self, Deserializer, Unexpected, Visitor};

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlagVisitor)
    }

    #[derive(Clone, Copy)]
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean, 1/0, yes/no or on/off")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
            match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(Unexpected::Unsigned(value), &self)),
            }
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
            u64::try_from(value)
                .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
                .and_then(|value| self.visit_u64(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(E::invalid_value(Unexpected::Str(value), &self)),
            }
        }
    }
}
