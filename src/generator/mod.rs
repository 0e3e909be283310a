pub mod error;
pub mod outlet;
pub mod stage_agent;
pub mod state;
pub mod survey;
pub mod table;
pub mod workflow;
