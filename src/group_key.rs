use anyhow::{Context, Result};
use regex::Regex;

use crate::datastructures::{ConfigurationKey, KeyRemap};

pub type RemapFn = Box<dyn Fn(ConfigurationKey) -> ConfigurationKey + Send + Sync>;

/// Derives a [`ConfigurationKey`] from a file name.
///
/// The pattern needs two capturing groups: the first one must hold a base-10
/// integer, the second one is kept as an opaque string.
pub struct KeyExtractor {
    pattern: Regex,
    remap: Option<RemapFn>,
}

impl KeyExtractor {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid file name pattern: {pattern}"))?;
        anyhow::ensure!(
            pattern.captures_len() >= 3,
            "File name pattern {pattern} needs two capturing groups"
        );
        Ok(Self {
            pattern,
            remap: None,
        })
    }

    pub fn with_remap(
        mut self,
        remap: impl Fn(ConfigurationKey) -> ConfigurationKey + Send + Sync + 'static,
    ) -> Self {
        self.remap = Some(Box::new(remap));
        self
    }

    pub fn with_key_remap(self, remap: Option<&KeyRemap>) -> Self {
        match remap {
            Some(KeyRemap::FixedProperty2(property_2)) => {
                let property_2 = property_2.clone();
                self.with_remap(move |key| {
                    ConfigurationKey::new(key.property_1, property_2.as_str())
                })
            }
            None => self,
        }
    }

    /// Returns `None` for names that do not match or whose first group is not
    /// an integer.
    pub fn extract(&self, file_name: &str) -> Option<ConfigurationKey> {
        let captures = self.pattern.captures(file_name)?;
        let property_1 = captures.get(1)?.as_str().parse::<i64>().ok()?;
        let property_2 = captures.get(2)?.as_str();
        let key = ConfigurationKey::new(property_1, property_2);
        Some(match &self.remap {
            Some(remap) => remap(key),
            None => key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::KeyExtractor;
    use crate::datastructures::{ConfigurationKey, KeyRemap};

    #[test]
    fn test_fraction_file_names() {
        let extractor =
            KeyExtractor::new(r"^(\d+)_(\d*n-div-\d+).(\d+).out$").unwrap();
        assert_eq!(
            extractor.extract("16_3n-div-8.7.out"),
            Some(ConfigurationKey::new(16, "3n-div-8"))
        );
        assert_eq!(
            extractor.extract("4_n-div-2.0.out"),
            Some(ConfigurationKey::new(4, "n-div-2"))
        );
        assert_eq!(extractor.extract("4_n-div-2.out"), None);
        assert_eq!(extractor.extract("notes.txt"), None);
    }

    #[test]
    fn test_remap_folds_generated_instances() {
        let extractor = KeyExtractor::new(r"^(\d+)_(\d+).(\d+).out$")
            .unwrap()
            .with_key_remap(Some(&KeyRemap::FixedProperty2(
                "n-div-8".to_string(),
            )));
        assert_eq!(
            extractor.extract("32_256.3.out"),
            Some(ConfigurationKey::new(32, "n-div-8"))
        );
    }

    #[test]
    fn test_custom_remap() {
        let extractor = KeyExtractor::new(r"^(\d+)_(\d+)reps.(\d+).out$")
            .unwrap()
            .with_remap(|key| {
                ConfigurationKey::new(key.property_1 * 2, key.property_2)
            });
        assert_eq!(
            extractor.extract("4_3reps.1.out"),
            Some(ConfigurationKey::new(8, "3"))
        );
    }

    #[test]
    fn test_overflowing_integer_is_skipped() {
        let extractor = KeyExtractor::new(r"^(\d+)_(\S+)$").unwrap();
        assert_eq!(extractor.extract("99999999999999999999999_x"), None);
    }

    #[test]
    fn test_pattern_needs_two_groups() {
        assert!(KeyExtractor::new(r"^(\d+).out$").is_err());
        assert!(KeyExtractor::new(r"^(\d+").is_err());
    }
}
