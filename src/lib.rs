pub mod bag;
pub mod config;
pub mod convert;
pub mod dedup;
pub mod error;
pub mod graph;
pub mod incidents;
pub mod lineups;
pub mod lists;
pub mod match_convert;
pub mod rows;
pub mod schema;
pub mod sink;
pub mod statistics;

pub use bag::RecordBag;
pub use config::ConvertConfig;
pub use error::ConvertError;
pub use match_convert::{MatchConversion, MatchConverter, Phase, PhaseStatus, convert_match};
