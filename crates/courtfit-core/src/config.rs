// Configuration loading and parsing (engine.toml).

use crate::aggregate::FitWeights;
use crate::player::Position;
use crate::scheme::SchemeSettings;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

const ENGINE_FILE: &str = "engine.toml";
const WEIGHT_TOLERANCE: f64 = 1e-6;

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
// Assembled config
// ---------------------------------------------------------------------------

/// Immutable engine configuration. Lookup tables are keyed by PLAYER_ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub weights: FitWeights,
    pub scheme: SchemeSettings,
    /// Players whose source-listed position is known to be wrong.
    pub position_overrides: BTreeMap<i64, Position>,
    /// Ages for players whose bio data lacks a birthdate.
    pub known_ages: BTreeMap<i64, f64>,
    pub data: DataPaths,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub reference_population: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            reference_population: "data/reference_population.csv".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// engine.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target. TOML table keys are strings, so the id-keyed
/// tables are parsed and checked in `assemble`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EngineFile {
    weights: FitWeights,
    scheme: SchemeSettings,
    position_overrides: HashMap<String, String>,
    known_ages: HashMap<String, f64>,
    data: DataPaths,
}

fn parse_player_id(table: &str, key: &str) -> Result<i64, ConfigError> {
    key.trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::ValidationError {
            field: format!("{table}.{key}"),
            message: "key must be an integer PLAYER_ID".into(),
        })
}

fn assemble(file: EngineFile) -> Result<EngineConfig, ConfigError> {
    let mut position_overrides = BTreeMap::new();
    for (key, label) in &file.position_overrides {
        let id = parse_player_id("position_overrides", key)?;
        let pos = Position::from_str_pos(label).ok_or_else(|| ConfigError::ValidationError {
            field: format!("position_overrides.{key}"),
            message: format!("expected one of PG, SG, SF, PF, C; got {label:?}"),
        })?;
        position_overrides.insert(id, pos);
    }

    let mut known_ages = BTreeMap::new();
    for (key, age) in &file.known_ages {
        known_ages.insert(parse_player_id("known_ages", key)?, *age);
    }

    Ok(EngineConfig {
        weights: file.weights,
        scheme: file.scheme,
        position_overrides,
        known_ages,
        data: file.data,
    })
}

/// Parse and validate engine.toml text.
pub fn parse_config(text: &str, path: &Path) -> Result<EngineConfig, ConfigError> {
    let file: EngineFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = assemble(file)?;
    validate(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/engine.toml` relative to `base_dir`.
///
/// Does not copy defaults; see [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<EngineConfig, ConfigError> {
    let path = base_dir.join("config").join(ENGINE_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path)
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

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
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

/// Copy defaults into `base_dir/config` if needed, then load.
pub fn load_config(base_dir: &Path) -> Result<EngineConfig, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
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

pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    let w = &config.weights;
    let weight_fields: &[(&str, f64)] = &[
        ("weights.role_match", w.role_match),
        ("weights.scheme_fit", w.scheme_fit),
        ("weights.lineup_synergy", w.lineup_synergy),
        ("weights.team_redundancy", w.team_redundancy),
        ("weights.upside", w.upside),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be >= 0, got {val}"),
            });
        }
    }
    if (w.total() - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::ValidationError {
            field: "weights".into(),
            message: format!("must sum to 1.0, got {}", w.total()),
        });
    }
    if w.total() - w.scheme_fit <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "weights".into(),
            message: "non-scheme weights must not all be zero".into(),
        });
    }

    let s = &config.scheme;
    if !(s.sigma.is_finite() && s.sigma > 0.0) {
        return Err(ConfigError::ValidationError {
            field: "scheme.sigma".into(),
            message: format!("must be > 0, got {}", s.sigma),
        });
    }
    for (name, val) in [("scheme.floor", s.floor), ("scheme.boost_floor", s.boost_floor)] {
        if !(0.0..=100.0).contains(&val) {
            return Err(ConfigError::ValidationError {
                field: name.into(),
                message: format!("must be between 0 and 100 inclusive, got {val}"),
            });
        }
    }
    if s.boost_threshold.is_nan() || s.boost_threshold < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "scheme.boost_threshold".into(),
            message: format!("must be >= 0, got {}", s.boost_threshold),
        });
    }

    for (id, age) in &config.known_ages {
        if !(0.0..=60.0).contains(age) {
            return Err(ConfigError::ValidationError {
                field: format!("known_ages.{id}"),
                message: format!("must be between 0 and 60, got {age}"),
            });
        }
    }

    if config.data.reference_population.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.reference_population".into(),
            message: "must not be empty".into(),
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

    /// Workspace root, from either the crate dir or the repo root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        for candidate in [cwd.clone(), cwd.join("../.."), cwd.join("..")] {
            if candidate.join("defaults").join(ENGINE_FILE).exists() {
                return candidate;
            }
        }
        panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("courtfit_cfg_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn parse(text: &str) -> Result<EngineConfig, ConfigError> {
        parse_config(text, Path::new("engine.toml"))
    }

    #[test]
    fn shipped_defaults_parse_and_validate() {
        let root = project_root();
        let text = fs::read_to_string(root.join("defaults").join(ENGINE_FILE)).unwrap();
        let config = parse(&text).expect("defaults should be valid");
        assert_eq!(config.weights, FitWeights::default());
        assert_eq!(config.scheme, SchemeSettings::default());
        assert_eq!(config.position_overrides.get(&2544), Some(&Position::SF));
        assert_eq!(config.position_overrides.get(&203999), Some(&Position::C));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_sections_fill_from_defaults() {
        let config = parse("[scheme]\nsigma = 0.8\n").unwrap();
        assert_eq!(config.scheme.sigma, 0.8);
        assert_eq!(config.scheme.floor, 30.0);
    }

    #[test]
    fn override_tables_are_parsed() {
        let text = r#"
[position_overrides]
"1629029" = "PG"
"-5" = "c"

[known_ages]
"2544" = 40
"#;
        let config = parse(text).unwrap();
        assert_eq!(config.position_overrides.get(&1629029), Some(&Position::PG));
        assert_eq!(config.position_overrides.get(&-5), Some(&Position::C));
        assert_eq!(config.known_ages.get(&2544), Some(&40.0));
    }

    #[test]
    fn bad_override_label_is_rejected() {
        let err = parse("[position_overrides]\n\"12\" = \"Wing\"\n").unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "position_overrides.12"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_player_id_is_rejected() {
        let err = parse("[known_ages]\nlebron = 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let err = parse("[weights]\nrole_match = 0.9\n").unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "weights"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_weight_is_rejected() {
        let text = "[weights]\nrole_match = -0.1\nscheme_fit = 0.6\nlineup_synergy = 0.25\nteam_redundancy = 0.15\nupside = 0.1\n";
        let err = parse(text).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "weights.role_match"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sigma_must_be_positive() {
        assert!(parse("[scheme]\nsigma = 0.0\n").is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(parse("[weights\n"), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn missing_config_is_file_not_found() {
        let dir = scratch_dir("missing");
        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn ensure_config_files_copies_once_and_skips_examples() {
        let dir = scratch_dir("copy");
        fs::create_dir_all(dir.join("defaults")).unwrap();
        fs::write(dir.join("defaults").join(ENGINE_FILE), "[scheme]\nsigma = 0.5\n").unwrap();
        fs::write(dir.join("defaults").join("local.toml.example"), "x = 1\n").unwrap();

        let copied = ensure_config_files(&dir).unwrap();
        assert_eq!(copied.len(), 1);
        assert!(!dir.join("config").join("local.toml.example").exists());

        // Existing files are never overwritten.
        fs::write(dir.join("config").join(ENGINE_FILE), "[scheme]\nsigma = 0.7\n").unwrap();
        assert!(ensure_config_files(&dir).unwrap().is_empty());
        assert_eq!(load_config(&dir).unwrap().scheme.sigma, 0.7);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn no_defaults_and_no_config_is_an_error() {
        let dir = scratch_dir("bare");
        assert!(matches!(
            ensure_config_files(&dir),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
