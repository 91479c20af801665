//! Histogram bins and their integration.
//!
//! - [`BinDescriptor`], [`BinSampling`]: what a bin is and how it is sampled
//! - [`BinIntegrationJob`]: warm-up and refine stages of one bin
//! - [`schedule`]: ordered sequential or parallel execution of all bins
//! - [`BinResult`], [`IntegrationOutcome`], [`JobError`]: per-bin results

mod descriptor;
mod job;
mod outcome;
mod scheduler;

pub use descriptor::{BinDescriptor, BinSampling};
pub use job::{BinIntegrationJob, JobPhase};
pub use outcome::{BinResult, IntegrationOutcome, JobError};
pub use scheduler::{schedule, Dispatch, DispatchKind, SchedulerError};
