//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use super::payment::Currency;
use crate::error::PayexError;

/// Main configuration for the payex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayexConfig {
    /// Extraction configuration.
    pub extraction: ExtractionConfig,

    /// Known bank sender domains.
    pub banks: BankConfig,
}

/// Default body size limit, in bytes. Leaves room for inline images.
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Extraction behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Largest body (text or HTML) accepted, in bytes.
    pub max_body_bytes: usize,

    /// Decode quoted-printable artefacts (`=20`, `=3D`) in text bodies.
    pub decode_quoted_printable: bool,

    /// Look for a "FROM NAME TO" sender narration.
    pub extract_sender: bool,

    /// Look for a labelled account number.
    pub extract_account_number: bool,

    /// Currency reported when the email names none.
    pub default_currency: Currency,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            decode_quoted_printable: true,
            extract_sender: true,
            extract_account_number: true,
            default_currency: Currency::Ngn,
        }
    }
}

/// Bank template table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub templates: Vec<BankTemplate>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            templates: vec![
                BankTemplate::new("gtbank.com", "GTBank"),
                BankTemplate::new("accessbank.com", "Access Bank"),
            ],
        }
    }
}

impl BankConfig {
    /// Find the template whose domain appears in a (lower-cased) sender address.
    pub fn find(&self, from_address: &str) -> Option<&BankTemplate> {
        let from = from_address.to_lowercase();
        self.templates
            .iter()
            .find(|t| !t.domain.is_empty() && from.contains(&t.domain.to_lowercase()))
    }
}

/// A bank known by its sender domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTemplate {
    /// Sender domain, e.g. `gtbank.com`.
    pub domain: String,

    /// Display name.
    pub name: String,
}

impl BankTemplate {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
        }
    }
}

impl PayexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Reject settings the extractor cannot work with.
    pub fn validate(&self) -> Result<(), PayexError> {
        if self.extraction.max_body_bytes == 0 {
            return Err(PayexError::Config(
                "extraction.max_body_bytes must be positive".to_string(),
            ));
        }
        if let Some(template) = self.banks.templates.iter().find(|t| t.domain.trim().is_empty()) {
            return Err(PayexError::Config(format!(
                "bank template '{}' has an empty domain",
                template.name
            )));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bank_lookup() {
        let banks = BankConfig::default();
        assert_eq!(
            banks.find("alerts@GTBank.com").map(|t| t.name.as_str()),
            Some("GTBank")
        );
        assert!(banks.find("someone@example.com").is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PayexConfig =
            serde_json::from_str(r#"{"extraction": {"default_currency": "USD"}}"#).unwrap();
        assert_eq!(config.extraction.default_currency, Currency::Usd);
        assert!(config.extraction.decode_quoted_printable);
        assert_eq!(config.extraction.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.banks.templates.len(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(PayexConfig::default().validate().is_ok());

        let mut config = PayexConfig::default();
        config.extraction.max_body_bytes = 0;
        assert!(matches!(config.validate(), Err(PayexError::Config(_))));

        let mut config = PayexConfig::default();
        config.banks.templates.push(BankTemplate::new(" ", "Nameless"));
        assert!(matches!(config.validate(), Err(PayexError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PayexConfig::default();
        config.extraction.extract_sender = false;
        config.banks.templates.push(BankTemplate::new("zenithbank.com", "Zenith Bank"));
        config.save(&path).unwrap();

        let loaded = PayexConfig::from_file(&path).unwrap();
        assert!(!loaded.extraction.extract_sender);
        assert_eq!(loaded.banks.templates[2].name, "Zenith Bank");
    }
}
