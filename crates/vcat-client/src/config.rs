//! Client configuration.
//!
//! The client is configured through a flat map of string options, the way
//! catalog properties are passed around by table-format engines. Recognized
//! options are parsed into typed fields; every option is kept verbatim in
//! [`ClientConfig::properties`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Option controlling whether implied namespaces are computed and created.
pub const CREATE_IMPLIED_NAMESPACES: &str = "create-implied-namespaces";

/// Immutable configuration shared by a client and every instance it
/// re-pins to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Whether [`find_implied_namespaces`](crate::CatalogClient::find_implied_namespaces)
    /// contacts the service at all. Defaults to `true`.
    pub create_implied_namespaces: bool,
    /// All options as given, including unrecognized ones.
    pub properties: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            create_implied_namespaces: true,
            properties: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Build a config from string options.
    ///
    /// Boolean options accept `true` or `false` in any letter case; anything
    /// else is rejected with [`ClientError::InvalidConfig`].
    pub fn from_properties<I, K, V>(properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let properties: BTreeMap<String, String> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let create_implied_namespaces = match properties.get(CREATE_IMPLIED_NAMESPACES) {
            Some(value) => parse_bool(CREATE_IMPLIED_NAMESPACES, value)?,
            None => true,
        };

        Ok(Self {
            create_implied_namespaces,
            properties,
        })
    }

    /// Parse options from a TOML document of top-level scalar keys.
    ///
    /// ```
    /// use vcat_client::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml_str("create-implied-namespaces = false").unwrap();
    /// assert!(!config.create_implied_namespaces);
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let table: toml::Table = input
            .parse()
            .map_err(|e: toml::de::Error| ClientError::ConfigParse(e.to_string()))?;

        let mut properties = BTreeMap::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => {
                    return Err(ClientError::ConfigParse(format!(
                        "option '{key}' must be a scalar, found {}",
                        other.type_str()
                    )))
                }
            };
            properties.insert(key, value);
        }
        Self::from_properties(properties)
    }

    /// Look up a raw option value.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

fn parse_bool(option: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ClientError::InvalidConfig {
            option: option.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_implied_namespaces() {
        let c = ClientConfig::default();
        assert!(c.create_implied_namespaces);
        assert!(c.properties.is_empty());

        let empty = ClientConfig::from_properties(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(empty, c);
    }

    #[test]
    fn disable_implied_namespaces() {
        let c = ClientConfig::from_properties([(CREATE_IMPLIED_NAMESPACES, "FALSE")]).unwrap();
        assert!(!c.create_implied_namespaces);
        assert_eq!(c.property(CREATE_IMPLIED_NAMESPACES), Some("FALSE"));
    }

    #[test]
    fn reject_non_boolean_value() {
        let err = ClientConfig::from_properties([(CREATE_IMPLIED_NAMESPACES, "nope")]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig { .. }), "got: {err}");
    }

    #[test]
    fn unknown_options_are_kept() {
        let c = ClientConfig::from_properties([("warehouse", "/tmp/wh")]).unwrap();
        assert!(c.create_implied_namespaces);
        assert_eq!(c.property("warehouse"), Some("/tmp/wh"));
        assert_eq!(c.property("missing"), None);
    }

    #[test]
    fn toml_scalars_become_strings() {
        let c = ClientConfig::from_toml_str(
            r#"
            create-implied-namespaces = true
            warehouse = "s3://bucket"
            retries = 3
            "#,
        )
        .unwrap();
        assert!(c.create_implied_namespaces);
        assert_eq!(c.property("warehouse"), Some("s3://bucket"));
        assert_eq!(c.property("retries"), Some("3"));
    }

    #[test]
    fn serde_roundtrip_through_toml() {
        let c = ClientConfig::from_properties([
            (CREATE_IMPLIED_NAMESPACES, "false"),
            ("warehouse", "s3://bucket"),
        ])
        .unwrap();
        let text = toml::to_string(&c).unwrap();
        let back: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, c);

        // Missing fields fall back to the defaults.
        let partial: ClientConfig = toml::from_str("create_implied_namespaces = false").unwrap();
        assert!(!partial.create_implied_namespaces);
        assert!(partial.properties.is_empty());
    }

    #[test]
    fn toml_rejects_tables_and_garbage() {
        let err = ClientConfig::from_toml_str("[nested]\nx = 1").unwrap_err();
        assert!(matches!(err, ClientError::ConfigParse(_)));
        let err = ClientConfig::from_toml_str("= broken").unwrap_err();
        assert!(matches!(err, ClientError::ConfigParse(_)));
    }
}
