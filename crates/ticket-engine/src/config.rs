//! Generator configuration: asset paths, output locations, and layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::TicketError;

/// Layout and asset configuration for ticket generation.
///
/// Defaults reproduce the standard ticket layout. Any subset of fields can
/// be overridden from a JSON file via [`TicketConfig::from_json_file`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketConfig {
    /// Base ticket artwork.
    pub template_path: PathBuf,
    /// Bold TTF/OTF used for the identifier stamp.
    pub font_path: PathBuf,
    /// Directory that receives `ticket_<id>.png` files.
    pub output_dir: PathBuf,
    /// Append-only CSV log of generated tickets.
    pub log_path: PathBuf,
    /// Prepended to the ticket identifier to form the QR payload.
    pub url_prefix: String,
    /// Edge length of the pasted QR code in pixels.
    pub qr_size: u32,
    /// Top-left corner of the QR paste area.
    pub qr_pos: (u32, u32),
    /// Top-left anchor of the identifier text.
    pub text_pos: (i32, i32),
    /// Identifier text size in pixels.
    pub font_size: f32,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("template.png"),
            font_path: PathBuf::from("fonts/ARIALBD.ttf"),
            output_dir: PathBuf::from("tickets"),
            log_path: PathBuf::from("tickets_log.csv"),
            url_prefix: "https://www.google.com/search?q=".to_string(),
            qr_size: qr_render::DEFAULT_QR_SIZE,
            qr_pos: (1180, 155),
            text_pos: (1200, 510),
            font_size: 28.0,
        }
    }
}

impl TicketConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, TicketError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_standard_layout() {
        let config = TicketConfig::default();
        assert_eq!(config.qr_size, 200);
        assert_eq!(config.qr_pos, (1180, 155));
        assert_eq!(config.text_pos, (1200, 510));
        assert_eq!(config.log_path, PathBuf::from("tickets_log.csv"));
    }

    #[test]
    fn from_json_file_keeps_defaults_for_missing_fields() {
        let dir = std::env::temp_dir().join("ticket_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"qr_size": 160, "url_prefix": "https://tickets.example/"}"#)
            .unwrap();

        let config = TicketConfig::from_json_file(&path).unwrap();
        assert_eq!(config.qr_size, 160);
        assert_eq!(config.url_prefix, "https://tickets.example/");
        assert_eq!(config.qr_pos, (1180, 155));
    }

    #[test]
    fn from_json_file_rejects_invalid_json() {
        let dir = std::env::temp_dir().join("ticket_config_test_bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(TicketConfig::from_json_file(&path).is_err());
    }
}
