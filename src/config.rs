use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Capture
    pub ptt_key: String,
    pub poll_interval_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub record_path: String,

    // Speech
    pub vosk_model_path: String,
    pub tts_engine: String,
    pub piper_voice: String,
    pub reply_audio_path: String,

    // Agent
    pub agent_url: String,
    pub agent_model: String,
    pub agent_timeout_secs: u64,
    /// Whether an empty voice transcript is still dispatched to the agent.
    /// Default true: the remote agent decides how to react to silence.
    pub dispatch_on_silence: bool,

    // Avatar session
    pub vts_url: String,
    pub vts_token_path: String,
    pub plugin_name: String,
    pub plugin_developer: String,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ptt_key: "RIGHT_SHIFT".to_string(),
            poll_interval_ms: 100,
            sample_rate: 44100,
            channels: 1,
            record_path: "input.wav".to_string(),
            vosk_model_path: dirs::data_dir()
                .unwrap_or_default()
                .join("yumi/models/model-en-us")
                .to_string_lossy()
                .to_string(),
            tts_engine: "piper".to_string(),
            piper_voice: "en_US-amy-medium".to_string(),
            reply_audio_path: "yumi.wav".to_string(),
            agent_url: "http://localhost:11434".to_string(),
            agent_model: "llama2".to_string(),
            agent_timeout_secs: 30,
            dispatch_on_silence: true,
            vts_url: "ws://localhost:8001".to_string(),
            vts_token_path: "yumi_token.txt".to_string(),
            plugin_name: "Yumi".to_string(),
            plugin_developer: "Yumi Contributors".to_string(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from file or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match serde_json::from_str(&content) {
                Ok(config) => Ok(config),
                Err(e) => {
                    // Graceful degradation: log warning and use defaults
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    let backup_path = path.with_extension("json.corrupt");
                    let _ = std::fs::rename(path, &backup_path);
                    Ok(Self::default())
                }
            }
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("yumi")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ptt_key, "RIGHT_SHIFT");
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.channels, 1);
        assert!(config.poll_interval_ms <= 100);
        assert!(config.dispatch_on_silence);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("Failed to serialize");
        let restored: Config = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(config.ptt_key, restored.ptt_key);
        assert_eq!(config.vts_url, restored.vts_url);
    }

    #[test]
    fn test_config_corrupt_json_handling() {
        // Config::load_from uses graceful degradation on corrupt files
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let config = Config::load_from(&path).expect("load should not fail");
        assert_eq!(config.ptt_key, Config::default().ptt_key);
        assert!(path.with_extension("json.corrupt").exists());
    }
}
