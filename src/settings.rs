use crate::error::SettingsError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_PATH: &str = "./data/settings.json";

// Application settings, stored as pretty JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>, // Overridden by OPENAI_API_KEY.
    pub model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub data_dir: PathBuf, // Transcripts live under <data_dir>/rounds.
    pub prompt_dir: Option<PathBuf>,
    pub scope: String, // Scope used by the console when a line names none.
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            openai_api_key: None,
            model: "gpt-4-turbo".to_string(),
            temperature: 0.7,
            request_timeout_secs: 120,
            data_dir: PathBuf::from("./data"),
            prompt_dir: None,
            scope: "console".to_string(),
            debug_mode: false,
        }
    }
}

impl Settings {
    // Loads the default settings file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::load_settings_from_file(DEFAULT_SETTINGS_PATH) {
            Ok(settings) => Ok(settings),
            Err(SettingsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings file at {DEFAULT_SETTINGS_PATH}, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    // Applies OPENAI_API_KEY and UMIGAME_MODEL from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("UMIGAME_MODEL").ok(),
        )
    }

    pub fn with_overrides(mut self, api_key: Option<String>, model: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.openai_api_key = Some(key);
        }
        if let Some(model) = model.filter(|model| !model.trim().is_empty()) {
            self.model = model;
        }
        self
    }

    pub fn rounds_dir(&self) -> PathBuf {
        self.data_dir.join("rounds")
    }
}
