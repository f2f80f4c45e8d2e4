//! Responder lookup

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PhoneNumber;

/// Patient and responder of the built-in single-entry table.
pub const DEFAULT_PATIENT_ID: &str = "12345";
pub const DEFAULT_RESPONDER_PHONE: &str = "+918074741601";

/// Maps a patient to the phone number of the responder to alert.
#[async_trait]
pub trait ResponderDirectory: Send + Sync {
    async fn resolve(&self, patient_id: &str) -> Option<PhoneNumber>;
}

/// Fixed in-memory directory, read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct StaticResponderDirectory {
    entries: HashMap<String, PhoneNumber>,
}

impl StaticResponderDirectory {
    /// Build from raw configuration; every number must be E.164.
    pub fn from_config(entries: &HashMap<String, String>) -> Result<Self> {
        let entries = entries
            .iter()
            .map(|(patient_id, phone)| {
                Ok((patient_id.trim().to_string(), PhoneNumber::parse(phone)?))
            })
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { entries })
    }

    pub fn with_entry(mut self, patient_id: impl Into<String>, phone: PhoneNumber) -> Self {
        self.entries.insert(patient_id.into(), phone);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw table used when configuration does not supply one.
pub fn default_responders() -> HashMap<String, String> {
    HashMap::from([(DEFAULT_PATIENT_ID.to_string(), DEFAULT_RESPONDER_PHONE.to_string())])
}

#[async_trait]
impl ResponderDirectory for StaticResponderDirectory {
    async fn resolve(&self, patient_id: &str) -> Option<PhoneNumber> {
        self.entries.get(patient_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_table() {
        let directory = StaticResponderDirectory::from_config(&default_responders()).unwrap();

        assert_eq!(directory.len(), 1);
        assert_eq!(
            directory.resolve("12345").await.unwrap().as_str(),
            "+918074741601"
        );
        assert!(directory.resolve("99999").await.is_none());
        assert!(directory.resolve("").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_exact() {
        let directory = StaticResponderDirectory::default()
            .with_entry("abc", PhoneNumber::parse("+15005550006").unwrap());

        assert!(directory.resolve("abc").await.is_some());
        assert!(directory.resolve("ABC").await.is_none());
        assert!(directory.resolve(" abc").await.is_none());
    }

    #[test]
    fn test_bad_number_in_config() {
        let entries = HashMap::from([("1".to_string(), "not-a-number".to_string())]);
        assert!(StaticResponderDirectory::from_config(&entries).is_err());
    }
}
