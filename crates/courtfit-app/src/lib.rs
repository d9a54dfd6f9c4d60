// Scoring app: request handling on top of the fit engine.

pub mod request;

pub use request::{run_request, RankedEntry, RequestError, ScoringRequest};
