pub mod cli;
pub mod config;
pub mod generator;
pub mod i18n;
pub mod llm;
pub mod logging;

// Re-export commonly used types
pub use config::Config;
pub use generator::stage_agent::{StageDescriptor, StageInvoker};
pub use generator::state::SharedState;
pub use generator::workflow::{launch, launch_with_invoker};
