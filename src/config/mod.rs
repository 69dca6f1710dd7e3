use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::errors::ConfigError;
use crate::utils::{app_data_dir, config_file_in};

const TMP_SUFFIX: &str = "tmp";

/// Experience awarded by the engine and the level curve it climbs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RewardRules {
    /// Granted for every logged transaction.
    pub log_xp: u32,
    /// Granted when budget is still left after the transaction.
    pub under_budget_bonus: u32,
    /// Granted once the streak reaches `streak_bonus_threshold` days.
    pub streak_bonus: u32,
    pub streak_bonus_threshold: u32,
    /// Level `n` needs `n * xp_per_level` experience to advance.
    pub xp_per_level: u32,
}

impl RewardRules {
    /// Per-level experience step, never zero so every level has a threshold.
    pub fn level_step(&self) -> u32 {
        self.xp_per_level.max(1)
    }
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            log_xp: 10,
            under_budget_bonus: 5,
            streak_bonus: 20,
            streak_bonus_threshold: 7,
            xp_per_level: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_monthly_budget")]
    pub monthly_budget: f64,
    #[serde(default)]
    pub rewards: RewardRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monthly_budget: Self::default_monthly_budget(),
            rewards: RewardRules::default(),
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`], as they appear in the file.
    pub const KEYS: [&'static str; 6] = [
        "monthly_budget",
        "log_xp",
        "under_budget_bonus",
        "streak_bonus",
        "streak_bonus_threshold",
        "xp_per_level",
    ];

    pub fn default_monthly_budget() -> f64 {
        50_000.0
    }

    /// Updates one field by key. The config is left unchanged if the result is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut updated = self.clone();
        let rewards = &mut updated.rewards;
        match key {
            "monthly_budget" => updated.monthly_budget = parse_value(key, value)?,
            "log_xp" => rewards.log_xp = parse_value(key, value)?,
            "under_budget_bonus" => rewards.under_budget_bonus = parse_value(key, value)?,
            "streak_bonus" => rewards.streak_bonus = parse_value(key, value)?,
            "streak_bonus_threshold" => rewards.streak_bonus_threshold = parse_value(key, value)?,
            "xp_per_level" => rewards.xp_per_level = parse_value(key, value)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "unknown key `{}`, expected one of {}",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.monthly_budget.is_finite() || self.monthly_budget <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "monthly_budget must be a positive number, got {}",
                self.monthly_budget
            )));
        }
        if self.rewards.xp_per_level == 0 {
            return Err(ConfigError::Invalid(
                "rewards.xp_per_level must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Loads and stores [`Config`] as JSON on disk.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the stored config, or the defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("`{}` is not a valid {}", value, key)))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_initial_engine_state() {
        let config = Config::default();
        assert_eq!(config.monthly_budget, 50_000.0);
        assert_eq!(config.rewards.xp_per_level, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let config: Config =
            serde_json::from_str(r#"{ "rewards": { "streak_bonus": 50 } }"#).unwrap();
        assert_eq!(config.monthly_budget, 50_000.0);
        assert_eq!(config.rewards.streak_bonus, 50);
        assert_eq!(config.rewards.log_xp, 10);
    }

    #[test]
    fn validate_rejects_non_positive_budget() {
        let mut config = Config::default();
        config.monthly_budget = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.monthly_budget = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn set_updates_known_keys() {
        let mut config = Config::default();
        config.set("monthly_budget", "800").unwrap();
        config.set("streak_bonus_threshold", " 3 ").unwrap();
        assert_eq!(config.monthly_budget, 800.0);
        assert_eq!(config.rewards.streak_bonus_threshold, 3);
    }

    #[test]
    fn set_rejects_bad_input_and_keeps_old_values() {
        let mut config = Config::default();
        assert!(matches!(config.set("theme", "dark"), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.set("log_xp", "-4"), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.set("xp_per_level", "0"), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.set("monthly_budget", "0"), Err(ConfigError::Invalid(_))));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn level_step_is_never_zero() {
        let rules = RewardRules {
            xp_per_level: 0,
            ..RewardRules::default()
        };
        assert_eq!(rules.level_step(), 1);
        assert_eq!(RewardRules::default().level_step(), 100);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/config.json"));
        assert_eq!(tmp, PathBuf::from("/data/config.json.tmp"));
    }
}
