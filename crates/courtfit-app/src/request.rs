// Scoring requests: JSON input, player materialization and ranked output.

use chrono::NaiveDate;
use courtfit_core::features::{build_player_vector, PlayerBio};
use courtfit_core::stats::{season_averages, GameLogLine};
use courtfit_core::{
    FitEngine, FitResult, PlayerVector, ReferencePopulation, RosterSummary, SchemeVector,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// A lineup holds the candidate plus at most this many teammates.
pub const MAX_TEAMMATES: usize = 4;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse request {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("too many teammates: {count} (at most {MAX_TEAMMATES})")]
    TooManyTeammates { count: usize },

    #[error("request has no candidates")]
    NoCandidates,

    #[error("player {player_id} has no games in its log")]
    EmptyGameLog { player_id: i64 },
}

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

/// Raw player data: bio plus one season's game log.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    #[serde(rename = "PLAYER_ID")]
    pub player_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: PlayerBio,
    pub games: Vec<GameLogLine>,
}

/// Either raw data to engineer, or a ready feature vector.
///
/// An entry with a `games` key is raw and must parse as [`RawPlayer`];
/// anything else is a vector.
#[derive(Debug, Clone)]
pub enum PlayerInput {
    Raw(RawPlayer),
    Vector(NamedVector),
}

impl<'de> Deserialize<'de> for PlayerInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("games").is_some() {
            RawPlayer::deserialize(value)
                .map(PlayerInput::Raw)
                .map_err(|e| D::Error::custom(format!("raw player: {e}")))
        } else {
            NamedVector::deserialize(value)
                .map(PlayerInput::Vector)
                .map_err(|e| D::Error::custom(format!("player vector: {e}")))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedVector {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub vector: PlayerVector,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringRequest {
    #[serde(default)]
    pub scheme: SchemeVector,
    #[serde(default = "default_true")]
    pub consider_scheme_fit: bool,
    pub candidates: Vec<PlayerInput>,
    #[serde(default)]
    pub teammates: Vec<PlayerInput>,
}

fn default_true() -> bool {
    true
}

impl ScoringRequest {
    pub fn from_json(text: &str, path: &Path) -> Result<Self, RequestError> {
        let request: ScoringRequest =
            serde_json::from_str(text).map_err(|e| RequestError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        request.validate()?;
        Ok(request)
    }

    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let text = std::fs::read_to_string(path).map_err(|e| RequestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&text, path)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.candidates.is_empty() {
            return Err(RequestError::NoCandidates);
        }
        if self.teammates.len() > MAX_TEAMMATES {
            return Err(RequestError::TooManyTeammates {
                count: self.teammates.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Materialization
// ---------------------------------------------------------------------------

/// A scored-ready player and its display name.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub name: Option<String>,
    pub vector: PlayerVector,
}

impl PlayerInput {
    pub fn prepare(self, today: NaiveDate) -> Result<Prepared, RequestError> {
        match self {
            PlayerInput::Vector(v) => Ok(Prepared {
                name: v.name,
                vector: v.vector,
            }),
            PlayerInput::Raw(raw) => {
                let season = season_averages(&raw.games).ok_or(RequestError::EmptyGameLog {
                    player_id: raw.player_id,
                })?;
                Ok(Prepared {
                    name: raw.name,
                    vector: build_player_vector(raw.player_id, &raw.bio, &season, today),
                })
            }
        }
    }
}

fn prepare_all(
    inputs: Vec<PlayerInput>,
    today: NaiveDate,
) -> Result<Vec<Prepared>, RequestError> {
    inputs.into_iter().map(|p| p.prepare(today)).collect()
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub player_id: i64,
    pub name: Option<String>,
    pub interpretation: &'static str,
    pub result: FitResult,
}

/// Materialize every player, score the candidates against the lineup and
/// return them best first.
pub fn run_request<R: ReferencePopulation>(
    engine: &FitEngine<R>,
    request: ScoringRequest,
    today: NaiveDate,
) -> Result<Vec<RankedEntry>, RequestError> {
    request.validate()?;
    let ScoringRequest {
        scheme,
        consider_scheme_fit,
        candidates,
        teammates,
    } = request;

    let candidates = prepare_all(candidates, today)?;
    let teammates = prepare_all(teammates, today)?;
    if teammates.is_empty() && !consider_scheme_fit {
        warn!("no teammates and scheme fit disabled; scores reflect upside only");
    }

    let roster = (!teammates.is_empty())
        .then(|| RosterSummary::new(teammates.into_iter().map(|p| p.vector).collect()));

    let (names, vectors): (Vec<Option<String>>, Vec<PlayerVector>) =
        candidates.into_iter().map(|p| (p.name, p.vector)).unzip();
    let ranked = engine.rank(&vectors, &scheme, roster.as_ref(), consider_scheme_fit);
    info!(
        "ranked {} candidates against {} teammates",
        ranked.len(),
        roster.as_ref().map_or(0, RosterSummary::len)
    );

    Ok(ranked
        .into_iter()
        .map(|(vector, result)| {
            let name = vectors
                .iter()
                .position(|v| std::ptr::eq(v, vector))
                .and_then(|i| names[i].clone());
            RankedEntry {
                player_id: vector.player_id,
                name,
                interpretation: result.interpretation(),
                result,
            }
        })
        .collect())
}
