use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFormatConfig {
    /// Overs per inning offered when setup does not say otherwise.
    pub default_overs: u32,
    /// Upper bound accepted at setup.
    pub max_overs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub enabled: bool,
    /// Commentary lines kept, newest first.
    pub commentary_feed_len: usize,
    /// Shown instead of a commentary line when the service fails.
    #[serde(default)]
    pub fallback_line: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite path. ":memory:" keeps everything in process.
    pub db_path: String,
    /// Append every accepted transition to ball_log.
    pub event_log: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub match_format: MatchFormatConfig,
    pub narrative: NarrativeConfig,
    pub store: StoreConfig,
}

impl ScorerConfig {
    /// Load from the data/ directory.
    /// In tests, use ScorerConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/scorer.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ScorerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.match_format.default_overs == 0
            || config.match_format.default_overs > config.match_format.max_overs
        {
            anyhow::bail!(
                "{path}: default_overs must be in 1..={}",
                config.match_format.max_overs
            );
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            match_format: MatchFormatConfig {
                default_overs: 20,
                max_overs: 50,
            },
            narrative: NarrativeConfig {
                enabled: true,
                commentary_feed_len: 5,
                fallback_line: None,
            },
            store: StoreConfig {
                db_path: ":memory:".into(),
                event_log: true,
            },
        }
    }
}
