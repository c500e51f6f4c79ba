//! Code identifier module.
//!
//! Provides the `Code` type, an interned and case-normalized identifier
//! used for skill codes, stat ids and formula variable names. Uses
//! `Arc<str>` so clones are cheap and comparisons stay fast.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::sync::Arc;

/// Interned, uppercase identifier for skills, stats and formula variables.
///
/// Every constructor normalizes to ASCII uppercase, so codes written in
/// any case compare equal. This matches the tokenizer, which uppercases
/// variable names as it reads them.
///
/// # Examples
///
/// ```rust
/// use zzformula::Code;
///
/// let str_code = Code::new("str");
/// let str_code2: Code = "STR".into();
/// let str_code3: Code = String::from("StR").into();
///
/// assert_eq!(str_code, str_code2);
/// assert_eq!(str_code, str_code3);
/// assert_eq!(str_code.as_str(), "STR");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Code(Arc<str>);

impl Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Code::from(s))
    }
}

impl Code {
    /// Create a new `Code`, uppercasing the input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzformula::Code;
    ///
    /// assert_eq!(Code::new("dex").as_str(), "DEX");
    /// ```
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s.to_ascii_uppercase()))
    }

    /// Get the string representation of this `Code`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Code {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Code {
    fn from(mut s: String) -> Self {
        s.make_ascii_uppercase();
        Self(Arc::from(s))
    }
}

impl From<&Code> for Code {
    fn from(code: &Code) -> Self {
        code.clone()
    }
}

impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_creation() {
        let id1 = Code::new("STR");
        let id2 = Code::new("STR");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "STR");
    }

    #[test]
    fn test_code_case_normalization() {
        assert_eq!(Code::new("str"), Code::new("STR"));
        assert_eq!(Code::from(String::from("sTr")).as_str(), "STR");
    }

    #[test]
    fn test_code_ordering() {
        let con = Code::new("CON");
        let str_code = Code::new("STR");
        assert!(con < str_code);
    }

    #[test]
    fn test_code_set_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(Code::new("dex"));
        assert!(set.contains("DEX"));
    }

    #[test]
    fn test_code_serde_normalizes() {
        let code: Code = serde_json::from_str("\"wis\"").unwrap();
        assert_eq!(code.as_str(), "WIS");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"WIS\"");
    }
}
