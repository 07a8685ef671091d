// Resolver module - page URL in, direct stream URL out

pub mod diagnostics;
pub mod engines;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod profile;
pub mod selector;
pub mod traits;
pub mod utils;

pub use engines::{build_engine, CliEngine, EngineChain, EngineMode, PythonEngine};
pub use errors::{EngineError, ResolveError};
pub use models::{ExtractionRecord, FormatEntry, ResolutionRequest, ResolutionResponse, ResolvedVideo};
pub use orchestrator::Resolver;
pub use profile::{ExtractionProfile, HintValue, SiteProfile};
pub use selector::StreamSelector;
pub use traits::ExtractionEngine;
