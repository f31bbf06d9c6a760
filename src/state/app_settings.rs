use log::LevelFilter;
use std::path::PathBuf;

pub const ENV_API_URL: &str = "MATBRACKET_API_URL";
pub const ENV_BRACKET_JSON: &str = "MATBRACKET_BRACKET_JSON";
pub const ENV_TOURNAMENT: &str = "MATBRACKET_TOURNAMENT";
pub const ENV_LOG: &str = "MATBRACKET_LOG";

/// Where match lists come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BracketSource {
    /// A snapshot on disk; overrides the API.
    File(PathBuf),
    Api { base_url: String },
    /// The bundled double-elimination bracket.
    #[default]
    Demo,
}

impl BracketSource {
    pub fn describe(&self) -> String {
        match self {
            BracketSource::File(path) => format!("file {}", path.display()),
            BracketSource::Api { base_url } => base_url.clone(),
            BracketSource::Demo => "demo bracket".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub source: BracketSource,
    /// Tournament to open on startup instead of showing the list.
    pub initial_tournament: Option<String>,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let source = if let Some(path) = var(ENV_BRACKET_JSON) {
            BracketSource::File(PathBuf::from(path))
        } else if let Some(base_url) = var(ENV_API_URL) {
            BracketSource::Api { base_url }
        } else {
            BracketSource::Demo
        };

        Self {
            full_screen: false,
            log_level: var(ENV_LOG).and_then(|level| level.parse::<LevelFilter>().ok()),
            source,
            initial_tournament: var(ENV_TOURNAMENT),
        }
    }
}
