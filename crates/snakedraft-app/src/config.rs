// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use snakedraft_core::draft::state::{DraftSettings, DEFAULT_IMPORT_LINE_LIMIT, MAX_TEAM_NUMBER};

/// Largest league the snake arithmetic is configured for.
pub const MAX_LEAGUE_SIZE: u32 = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Everything read from `config/league.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub league: LeagueConfig,
    #[serde(default)]
    pub import: ImportConfig,
    pub data: DataPaths,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Teams in the league. Required: there is no sensible default.
    pub league_size: u32,
    /// The user's team number at the start of a draft.
    #[serde(default = "default_my_team")]
    pub my_team: u32,
    /// Known team labels (e.g. manager nicknames) and their team numbers.
    #[serde(default)]
    pub team_aliases: HashMap<String, u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Bulk imports over this many lines are refused.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            max_lines: default_max_lines(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Player reference list, `.csv` or `.json`, relative to the base dir.
    pub players: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_recent_picks")]
    pub recent_picks: usize,
    #[serde(default = "default_best_available")]
    pub best_available: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        RecommendationConfig {
            recent_picks: default_recent_picks(),
            best_available: default_best_available(),
        }
    }
}

fn default_my_team() -> u32 {
    1
}

fn default_max_lines() -> usize {
    DEFAULT_IMPORT_LINE_LIMIT
}

fn default_recent_picks() -> usize {
    8
}

fn default_best_available() -> usize {
    10
}

impl Config {
    /// Settings every new draft state is created from.
    pub fn draft_settings(&self) -> DraftSettings {
        DraftSettings {
            league_size: self.league.league_size,
            my_team_id: self.league.my_team,
            import_line_limit: self.import.max_lines,
            team_aliases: self.league.team_aliases.clone(),
            recent_picks: self.recommendations.recent_picks,
            best_available: self.recommendations.best_available,
        }
    }

    /// Player list path resolved against `base_dir` when relative.
    pub fn players_path(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.data.players);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/league.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let text = read_file(&league_path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying default
/// config files first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let size = config.league.league_size;
    if size == 0 || size > MAX_LEAGUE_SIZE {
        return Err(ConfigError::ValidationError {
            field: "league.league_size".into(),
            message: format!("must be between 1 and {MAX_LEAGUE_SIZE}, got {size}"),
        });
    }

    let my_team = config.league.my_team;
    if !(1..=MAX_TEAM_NUMBER).contains(&my_team) {
        return Err(ConfigError::ValidationError {
            field: "league.my_team".into(),
            message: format!("must be between 1 and {MAX_TEAM_NUMBER}, got {my_team}"),
        });
    }

    if let Some((label, _)) = config.league.team_aliases.iter().find(|&(_, &id)| id == 0) {
        return Err(ConfigError::ValidationError {
            field: format!("league.team_aliases.{label}"),
            message: "team ids start at 1".into(),
        });
    }

    if config.import.max_lines == 0 {
        return Err(ConfigError::ValidationError {
            field: "import.max_lines".into(),
            message: "must be > 0".into(),
        });
    }

    if config.data.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.players".into(),
            message: "must name a .csv or .json file".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the path to the app crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/snakedraft-app/defaults").exists() {
            cwd.join("crates/snakedraft-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with `config/league.toml` holding `league_toml`.
    fn temp_config(name: &str, league_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/league.toml"), league_toml).unwrap();
        tmp
    }

    const MINIMAL: &str = "\
[league]
name = \"Minimal\"
league_size = 10

[data]
players = \"players.csv\"
";

    #[test]
    fn load_valid_config_from_project_files() {
        let root = project_root();
        let tmp = std::env::temp_dir().join("snakedraft_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            root.join("defaults/league.toml"),
            tmp.join("config/league.toml"),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.league.name, "Sunday Snake League");
        assert_eq!(config.league.league_size, 12);
        assert_eq!(config.league.my_team, 1);
        assert_eq!(config.league.team_aliases.get("Gridiron Gurus"), Some(&2));
        assert_eq!(config.import.max_lines, 20);
        assert_eq!(config.data.players, "data/players.csv");
        assert_eq!(config.recommendations.recent_picks, 8);
        assert_eq!(config.recommendations.best_available, 10);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_take_defaults() {
        let tmp = temp_config("snakedraft_config_minimal", MINIMAL);
        let config = load_config_from(&tmp).expect("minimal config loads");
        assert_eq!(config.league.my_team, 1);
        assert!(config.league.team_aliases.is_empty());
        assert_eq!(config.import.max_lines, DEFAULT_IMPORT_LINE_LIMIT);
        assert_eq!(config.recommendations.best_available, 10);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn draft_settings_carry_config_values() {
        let tmp = temp_config(
            "snakedraft_config_settings",
            "[league]\nname = \"X\"\nleague_size = 8\nmy_team = 3\n\
             [league.team_aliases]\n\"Taco Corp\" = 5\n\
             [import]\nmax_lines = 12\n\
             [data]\nplayers = \"p.json\"\n\
             [recommendations]\nrecent_picks = 4\nbest_available = 6\n",
        );
        let config = load_config_from(&tmp).unwrap();
        let settings = config.draft_settings();
        assert_eq!(settings.league_size, 8);
        assert_eq!(settings.my_team_id, 3);
        assert_eq!(settings.import_line_limit, 12);
        assert_eq!(settings.team_aliases.get("Taco Corp"), Some(&5));
        assert_eq!(settings.recent_picks, 4);
        assert_eq!(settings.best_available, 6);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn league_size_is_required() {
        let tmp = temp_config(
            "snakedraft_config_no_size",
            "[league]\nname = \"X\"\n[data]\nplayers = \"p.csv\"\n",
        );
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_league_size_zero() {
        let tmp = temp_config(
            "snakedraft_config_size_zero",
            &MINIMAL.replace("league_size = 10", "league_size = 0"),
        );
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.league_size"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_my_team_out_of_bounds() {
        let tmp = temp_config(
            "snakedraft_config_my_team",
            &MINIMAL.replace("league_size = 10", "league_size = 10\nmy_team = 13"),
        );
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.my_team"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_alias_id() {
        let tmp = temp_config(
            "snakedraft_config_alias_zero",
            &format!("{MINIMAL}\n[league.team_aliases]\n\"Bad\" = 0\n"),
        );
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "league.team_aliases.Bad")
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_max_lines() {
        let tmp = temp_config(
            "snakedraft_config_max_lines",
            &format!("{MINIMAL}\n[import]\nmax_lines = 0\n"),
        );
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "import.max_lines"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("snakedraft_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("config/league.toml")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("snakedraft_config_invalid", "[league\nname = ");
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn players_path_resolves_relative_to_base() {
        let tmp = temp_config("snakedraft_config_paths", MINIMAL);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.players_path(&tmp), tmp.join("players.csv"));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("snakedraft_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), MINIMAL).unwrap();
        fs::write(tmp.join("defaults/league.toml.example"), MINIMAL).unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config/league.toml")]);
        assert!(!tmp.join("config/league.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("snakedraft_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), MINIMAL).unwrap();
        fs::write(tmp.join("config/league.toml"), "# mine\n").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        assert_eq!(
            fs::read_to_string(tmp.join("config/league.toml")).unwrap(),
            "# mine\n"
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("snakedraft_ensure_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp).unwrap_err(),
            ConfigError::DefaultsCopyError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
