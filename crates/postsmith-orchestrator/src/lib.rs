//! # postsmith-orchestrator
//!
//! Generation orchestration for Postsmith.
//!
//! This crate provides:
//! - The job catalog and deterministic prompt builder
//! - Parsing of generated ideas and carousel slides
//! - The orchestrator: per-job state folding and concurrent fan-out
//! - The pure wizard state machine and a session driver for it

mod job;
mod orchestrator;
mod parse;
mod prompt;
mod session;
mod state_machine;

pub use job::{AdviceKind, GenerationRequest, Job, JobId, JobKind, JobTarget};
pub use orchestrator::{
    fan_out_jobs, Advisory, FanOutReport, JobOutcome, Orchestrator, OrchestratorState, Reply,
};
pub use parse::{parse_carousel, parse_ideas};
pub use prompt::build_prompt;
pub use session::Session;
pub use state_machine::{transition, Action, Event, Gates, Stage};
