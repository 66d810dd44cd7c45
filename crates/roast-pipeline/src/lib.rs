//! Batch orchestration for the persona roast pipeline.

pub mod callback;
pub mod clock;
pub mod error;
pub mod orchestrator;
pub mod poller;
pub mod script;
pub mod wiring;

pub use callback::CallbackClient;
pub use clock::{Clock, TokioClock};
pub use error::PipelineError;
pub use orchestrator::{BatchOptions, Collaborators, Orchestrator, PipelineSettings};
pub use poller::{JobPoller, PollPolicy};
pub use script::{parse_script, ScriptError};
pub use wiring::{build_live_orchestrator, settings_from_config, BuildError};
