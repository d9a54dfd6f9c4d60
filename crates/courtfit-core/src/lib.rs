// Library root: the fit scoring engine and the loaders that feed it.

pub mod aggregate;
pub mod config;
pub mod features;
pub mod normalize;
pub mod player;
pub mod position;
pub mod reference;
pub mod role;
pub mod roster;
pub mod scheme;
pub mod stats;

pub use aggregate::{ArchetypeLabel, FitEngine, FitResult};
pub use config::{ConfigError, EngineConfig};
pub use features::{build_player_vector, PlayerBio};
pub use player::{CountingStats, Feature, PlayerVector, Position};
pub use reference::{ReferenceError, ReferencePopulation, ReferenceTable};
pub use roster::RosterSummary;
pub use scheme::{SchemeAxis, SchemeVector};
pub use stats::{season_averages, GameLogLine, SeasonAverages};
