//! Decryption of secret property values
//!
//! The build host owns the actual decryption (master passwords, settings
//! security files). The reconciler only sees the result: a map of keys whose
//! values were encrypted placeholders, to their clear-text values.

use super::PropertyMap;

pub trait PropertyDecryptor {
    /// Returns decrypted values for the keys of `properties` this decryptor
    /// recognizes. Keys it does not recognize are absent from the result.
    fn decrypt_properties(&self, properties: &PropertyMap) -> PropertyMap;
}

/// Recognizes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDecryptor;

impl PropertyDecryptor for NoopDecryptor {
    fn decrypt_properties(&self, _properties: &PropertyMap) -> PropertyMap {
        PropertyMap::new()
    }
}

/// Decrypts from a fixed table of key to clear-text value, for keys that are
/// present in the input.
#[derive(Debug, Default, Clone)]
pub struct StaticDecryptor {
    secrets: PropertyMap,
}

impl StaticDecryptor {
    pub fn new(secrets: PropertyMap) -> Self {
        Self { secrets }
    }
}

impl PropertyDecryptor for StaticDecryptor {
    fn decrypt_properties(&self, properties: &PropertyMap) -> PropertyMap {
        properties
            .keys()
            .filter_map(|key| {
                self.secrets
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_noop_decryptor_returns_nothing() {
        let input = props(&[("sonar.login", "{abc}")]);
        assert!(NoopDecryptor.decrypt_properties(&input).is_empty());
    }

    #[test]
    fn test_static_decryptor_only_returns_present_keys() {
        let decryptor = StaticDecryptor::new(props(&[
            ("sonar.login", "secret"),
            ("sonar.password", "hunter2"),
        ]));
        let input = props(&[("sonar.login", "{abc}"), ("sonar.sources", "src")]);

        let decrypted = decryptor.decrypt_properties(&input);

        assert_eq!(decrypted, props(&[("sonar.login", "secret")]));
    }
}
