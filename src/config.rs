//! Configuration management for incon-tools
//!
//! Config stored at: ~/.config/incon-tools/config.json

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::palette::default_type_colors;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SMTP server hostname
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,

    /// SMTP port (25 = plain relay, 587 = STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Header `From:` address
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// SMTP password; authentication is skipped when unset
    #[serde(default)]
    pub sender_password: Option<String>,

    /// Envelope `MAIL FROM` override (send on behalf)
    #[serde(default)]
    pub envelope_sender: Option<String>,

    /// Fallback TO address when the recipient lookup fails
    #[serde(default = "default_recipient")]
    pub default_recipient: String,

    /// SQLite database holding DESTINATARIOS_EMAIL_INCIDENTES
    #[serde(default)]
    pub recipients_db: Option<PathBuf>,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub zoom_start: u8,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Marker colors by category, merged over the built-in palette
    #[serde(default = "default_type_colors")]
    pub type_colors: BTreeMap<String, String>,
}

fn default_smtp_server() -> String {
    "smtp.example.com".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_sender_email() -> String {
    "incon@example.com".to_string()
}

fn default_recipient() -> String {
    "seguranca@example.com".to_string()
}

fn default_zoom() -> u8 {
    12
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            sender_email: default_sender_email(),
            sender_password: None,
            envelope_sender: None,
            default_recipient: default_recipient(),
            recipients_db: None,
            zoom_start: default_zoom(),
            output_format: default_output_format(),
            type_colors: default_type_colors(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("no config directory on this platform".to_string()))?
            .join("incon-tools");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Incon Tools Configuration")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        writeln!(f, "SMTP server:       {}", self.smtp_server)?;
        writeln!(f, "SMTP port:         {}", self.smtp_port)?;
        writeln!(f, "Sender email:      {}", self.sender_email)?;
        writeln!(
            f,
            "Sender password:   {}",
            if self.sender_password.is_some() { "(set)" } else { "(none)" }
        )?;
        writeln!(
            f,
            "Envelope sender:   {}",
            self.envelope_sender.as_deref().unwrap_or("(same as sender)")
        )?;
        writeln!(f, "Default recipient: {}", self.default_recipient)?;
        writeln!(
            f,
            "Recipients DB:     {}",
            self.recipients_db
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        writeln!(f, "Map zoom:          {}", self.zoom_start)?;
        writeln!(f, "Output format:     {}", self.output_format)?;
        writeln!(f, "Type colors:       {} categories", self.type_colors.len())?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:       {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.smtp_port, 25);
        assert_eq!(back.smtp_server, config.smtp_server);
        assert_eq!(back.zoom_start, 12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"smtp_server": "mail.interno.local"}"#).unwrap();
        assert_eq!(config.smtp_server, "mail.interno.local");
        assert_eq!(config.smtp_port, 25);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert!(config.type_colors.contains_key("VEÍCULO 1"));
    }

    #[test]
    fn test_output_format_round_trips() {
        let mut config = Config::default();
        config.output_format = OutputFormat::Json;
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"output_format\":\"json\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_display_masks_password() {
        let mut config = Config::default();
        config.sender_password = Some("s3cret".to_string());
        let shown = config.to_string();
        assert!(shown.contains("(set)"));
        assert!(!shown.contains("s3cret"));
    }
}
