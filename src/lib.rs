// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive CLI.
//
// Module responsibilities:
// - `config`: Loads imgflip credentials and the API base URL from `.env`
//   files and the process environment.
// - `api`: Blocking HTTP client for the imgflip endpoints (template
//   catalog, single template, captioning) and the JSON wire types.
// - `ui`: The list / prompt / caption loop and operator-facing messages.
// - `error`: Typed errors for the library surface.
pub mod api;
pub mod config;
pub mod error;
pub mod ui;

pub use api::{CaptionData, CaptionOutcome, CaptionResult, MemeClient, MemeTemplate};
pub use config::{Config, Credentials};
pub use error::{ConfigError, MemeError};
