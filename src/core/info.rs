//! Tokenizer for the INFO column.
//!
//! The INFO column is a `;`-separated list of tokens. A token is either a
//! `KEY=VALUE` pair or a bare flag. A value runs until the next `;` (or the
//! end of the string) and may itself contain `=`:
//!
//! ```text
//! set=gatk-varscan;QD=5.0;DB;ANN=T|missense_variant|MODERATE|BRCA2|...
//! ```
//!
//! All knowledge of this micro-language lives here; callers only ever ask
//! for a key.

use thiserror::Error;

/// Separator between INFO tokens
pub const INFO_DELIMITER: char = ';';

/// Separator between a key and its value
pub const KEY_VALUE_SEPARATOR: char = '=';

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InfoError {
    #[error("Could not convert {key} value '{value}' to a number")]
    NotNumeric { key: String, value: String },
}

/// Borrowed view over a raw INFO string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoField<'a> {
    raw: &'a str,
}

impl<'a> InfoField<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Iterate `(key, value)` pairs in order. Flags yield an empty value.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.raw
            .split(INFO_DELIMITER)
            .filter(|token| !token.is_empty())
            .map(|token| token.split_once(KEY_VALUE_SEPARATOR).unwrap_or((token, "")))
    }

    /// Value of the first `KEY=VALUE` token whose key is `key`
    ///
    /// Flags (tokens without `=`) never match.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.raw
            .split(INFO_DELIMITER)
            .filter_map(|token| token.split_once(KEY_VALUE_SEPARATOR))
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// True if `key` is present as a flag or as a `KEY=VALUE` token
    pub fn contains(&self, key: &str) -> bool {
        self.iter().any(|(k, _)| k == key)
    }

    /// Numeric value of `key`, or `Ok(None)` if the key is absent
    ///
    /// # Errors
    ///
    /// Returns `InfoError::NotNumeric` if the value is not a float.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, InfoError> {
        self.get(key).map(|value| parse_f64(key, value)).transpose()
    }
}

/// Parse a float the way VCF writers print them (`5.0`, `-12.5`, `1e-3`, `nan`)
///
/// # Errors
///
/// Returns `InfoError::NotNumeric` naming `key` if `value` is not a float.
pub fn parse_f64(key: &str, value: &str) -> Result<f64, InfoError> {
    value.trim().parse::<f64>().map_err(|_| InfoError::NotNumeric {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = "AC=1;set=gatk-varscan;QD=5.0;DB;ANN=T|missense|MODERATE|BRCA2|x=y";

    #[test]
    fn test_get_first_token_value() {
        let info = InfoField::new(INFO);
        assert_eq!(info.get("set"), Some("gatk-varscan"));
        assert_eq!(info.get("QD"), Some("5.0"));
        assert_eq!(info.get("AC"), Some("1"));
    }

    #[test]
    fn test_get_at_end_of_string() {
        let info = InfoField::new("QD=5.0;set=Intersection");
        assert_eq!(info.get("set"), Some("Intersection"));
    }

    #[test]
    fn test_value_may_contain_separator() {
        let info = InfoField::new(INFO);
        assert_eq!(info.get("ANN"), Some("T|missense|MODERATE|BRCA2|x=y"));
    }

    #[test]
    fn test_key_must_match_exactly() {
        let info = InfoField::new("subset=gatk;MQRankSum=-1.2");
        assert_eq!(info.get("set"), None);
        assert_eq!(info.get("MQ"), None);
        assert_eq!(info.get("MQRankSum"), Some("-1.2"));
    }

    #[test]
    fn test_flags() {
        let info = InfoField::new(INFO);
        assert_eq!(info.get("DB"), None);
        assert!(info.contains("DB"));
        assert!(!info.contains("SOMATIC"));
    }

    #[test]
    fn test_iter_matches_get() {
        let info = InfoField::new(INFO);
        for (key, value) in info.iter().filter(|(k, _)| *k != "DB") {
            assert_eq!(info.get(key), Some(value));
        }
        assert_eq!(info.iter().count(), 5);
    }

    #[test]
    fn test_missing_info() {
        let info = InfoField::new(".");
        assert_eq!(info.get("set"), None);
        assert_eq!(info.iter().count(), 1);
    }

    #[test]
    fn test_get_f64() {
        let info = InfoField::new("QD=5.0;FS=oops;MQRankSum=-12.5");
        assert_eq!(info.get_f64("QD"), Ok(Some(5.0)));
        assert_eq!(info.get_f64("MQRankSum"), Ok(Some(-12.5)));
        assert_eq!(info.get_f64("DP"), Ok(None));
        assert_eq!(
            info.get_f64("FS"),
            Err(InfoError::NotNumeric {
                key: "FS".to_string(),
                value: "oops".to_string(),
            })
        );
    }
}
