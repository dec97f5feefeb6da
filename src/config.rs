use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Screening engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub schema_version: u32,

    /// Recording session length, measured in audio time
    pub session_duration_ms: u32,
    /// Samples per analysis frame; the engine rejects frames of any other length
    pub frame_size: usize,
    /// Maximum number of accepted pitch values kept for jitter/stability
    pub pitch_history_capacity: usize,

    // Accepted input rates
    pub min_sample_rate: u32,
    pub max_sample_rate: u32,

    /// What to do when a session captured no usable signal
    pub insufficient_signal: InsufficientSignalPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            session_duration_ms: 5000,
            frame_size: 2048,
            pitch_history_capacity: 100,
            min_sample_rate: 8000,
            max_sample_rate: 192_000,
            insufficient_signal: InsufficientSignalPolicy::Reject,
        }
    }
}

impl EngineConfig {
    /// Load config from file, or create default
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            let config: Self =
                serde_json::from_str(&content).context("Failed to parse config file")?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".voicescreen"))
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.json"))
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.session_duration_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "session_duration_ms must be positive".to_string(),
            ));
        }
        if self.frame_size == 0 {
            return Err(EngineError::InvalidConfig(
                "frame_size must be positive".to_string(),
            ));
        }
        if self.pitch_history_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "pitch_history_capacity must be positive".to_string(),
            ));
        }
        if self.min_sample_rate == 0 || self.min_sample_rate > self.max_sample_rate {
            return Err(EngineError::InvalidConfig(format!(
                "invalid sample rate range {}-{} Hz",
                self.min_sample_rate, self.max_sample_rate
            )));
        }
        Ok(())
    }

    /// Number of samples that make up one session at the given rate
    pub fn session_samples(&self, sample_rate: u32) -> u64 {
        sample_rate as u64 * self.session_duration_ms as u64 / 1000
    }
}

/// Handling of sessions in which no frame exceeded the energy floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsufficientSignalPolicy {
    /// Surface an error so the caller can ask for a retry
    Reject,
    /// Analyze a fixed placeholder aggregate, flagged as such in the result
    Placeholder,
}

impl Default for InsufficientSignalPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

impl std::str::FromStr for InsufficientSignalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "placeholder" => Ok(Self::Placeholder),
            _ => Err(format!("Unknown insufficient-signal policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.session_duration_ms, 5000);
        assert_eq!(config.pitch_history_capacity, 100);
        assert_eq!(config.insufficient_signal, InsufficientSignalPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_samples() {
        let config = EngineConfig::default();
        assert_eq!(config.session_samples(16000), 80_000);
        assert_eq!(config.session_samples(44100), 220_500);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = EngineConfig {
            pitch_history_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_rate_range() {
        let config = EngineConfig {
            min_sample_rate: 48000,
            max_sample_rate: 16000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = EngineConfig {
            session_duration_ms: 3000,
            insufficient_signal: InsufficientSignalPolicy::Placeholder,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EngineConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, EngineConfig::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "frame_size": 1024 }"#).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.frame_size, 1024);
        assert_eq!(loaded.session_duration_ms, 5000);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "placeholder".parse::<InsufficientSignalPolicy>().unwrap(),
            InsufficientSignalPolicy::Placeholder
        );
        assert_eq!(
            "REJECT".parse::<InsufficientSignalPolicy>().unwrap(),
            InsufficientSignalPolicy::Reject
        );
        assert!("retry".parse::<InsufficientSignalPolicy>().is_err());
    }
}
