//! Configuration management.
//!
//! A YAML file names the five MIDI endpoints and the initial controller
//! mode; everything else is runtime state.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::fs;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub midi: MidiConfig,
    /// Controller display mode applied on start
    #[serde(default = "default_mode")]
    pub mode: Mode,
}

/// The five MIDI endpoints of the gateway.
///
/// Names are matched case-insensitively as substrings of the platform port
/// names (Windows decorates them with device indices).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MidiConfig {
    /// Port carrying the host's control traffic (LED frames) into the gateway
    pub host_in: String,
    /// Port carrying translated pad events back to the host
    pub host_out: String,
    /// Port receiving the controller's untranslated stream in native mode
    pub host_out_native: String,
    /// The controller's event stream (pad presses)
    pub controller_in: String,
    /// The controller's command stream (LED and mode SysEx)
    pub controller_out: String,
}

/// Controller operating mode.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Raw passthrough; the host speaks the controller's grid encoding itself.
    Native,
    /// Custom SysEx framing; the gateway translates both directions.
    Program,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Native => write!(f, "native"),
            Mode::Program => write!(f, "program"),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("midi.host_in", &self.midi.host_in),
            ("midi.host_out", &self.midi.host_out),
            ("midi.host_out_native", &self.midi.host_out_native),
            ("midi.controller_in", &self.midi.controller_in),
            ("midi.controller_out", &self.midi.controller_out),
        ] {
            if value.is_empty() {
                bail!("{} cannot be empty", field);
            }
        }
        Ok(())
    }
}

fn default_mode() -> Mode {
    Mode::Program
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = "\
midi:
  host_in: \"gw-from-host\"
  host_out: \"gw-to-host\"
  host_out_native: \"gw-native\"
  controller_in: \"LPX\"
  controller_out: \"LPX\"
mode: native
";

    #[tokio::test]
    async fn test_load_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let config = AppConfig::load(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(config.midi.controller_in, "LPX");
        assert_eq!(config.mode, Mode::Native);
    }

    #[test]
    fn test_mode_defaults_to_program() {
        let without_mode = VALID.lines().take(6).collect::<Vec<_>>().join("\n");
        let config: AppConfig = serde_yaml::from_str(&without_mode).unwrap();
        assert_eq!(config.mode, Mode::Program);
    }

    #[test]
    fn test_empty_port_name_is_rejected() {
        let config: AppConfig = serde_yaml::from_str(&VALID.replace("\"LPX\"", "\"\"")).unwrap();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        assert!(AppConfig::load("does-not-exist.yaml").await.is_err());
    }
}
