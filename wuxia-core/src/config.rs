//! Environment-driven configuration.
//!
//! The binary loads a `.env` file (if present) before calling
//! [`Config::from_env`]; nothing here mutates global state. The API key
//! is carried as a plain value and handed to whichever component
//! constructs the generation client.

use std::path::PathBuf;

/// Name of the guideline set loaded when none is configured.
pub const DEFAULT_GUIDELINE_NAME: &str = "Complete DM Guidelines - Wuxia World Liang Wuzhao";

/// The single focus character whose data is always pulled into context.
pub const DEFAULT_FOCUS_CHARACTER: &str = "Liáng Wǔzhào";

/// Runtime configuration gathered from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat backend credential; absent disables generation.
    pub api_key: Option<String>,
    /// Model override for the chat backend.
    pub model: Option<String>,
    /// Path to the JSON world file.
    pub world_path: PathBuf,
    pub guideline_name: String,
    pub focus_character: String,
}

impl Config {
    /// Read configuration from environment variables, applying defaults.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("DM_MODEL").ok(),
            world_path: std::env::var("DM_WORLD_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("world.json")),
            guideline_name: std::env::var("DM_GUIDELINE_SET")
                .unwrap_or_else(|_| DEFAULT_GUIDELINE_NAME.to_string()),
            focus_character: std::env::var("DM_FOCUS_CHARACTER")
                .unwrap_or_else(|_| DEFAULT_FOCUS_CHARACTER.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            world_path: PathBuf::from("world.json"),
            guideline_name: DEFAULT_GUIDELINE_NAME.to_string(),
            focus_character: DEFAULT_FOCUS_CHARACTER.to_string(),
        }
    }
}
