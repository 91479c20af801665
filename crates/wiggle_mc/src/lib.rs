//! # Wiggle Monte Carlo Engine (Layer 2)
//!
//! ## Layer 2 Role
//!
//! wiggle_mc turns a physics process into a histogram of Monte Carlo
//! estimates:
//! - VEGAS adaptive importance sampling with warm-up and refine stages
//! - Per-bin jobs with deterministic seeds and private sampler state
//! - Sequential or Rayon-parallel dispatch with results kept in bin order
//! - Dilepton (γγ → l⁺l⁻) and inclusive jet processes
//! - Console, tab-separated and JSON result sinks
//!
//! Kinematic vectors, special functions and physical constants come from
//! Layer 1 (`wiggle_core`).
//!
//! ## Usage Example
//!
//! ```rust
//! use wiggle_mc::bins::{BinSampling, Dispatch};
//! use wiggle_mc::params::DileptonParameters;
//! use wiggle_mc::pipeline::run_histogram;
//! use wiggle_mc::process::DileptonProcess;
//! use wiggle_mc::vegas::VegasConfig;
//!
//! let process = DileptonProcess::new(DileptonParameters::default(), BinSampling::Midpoint).unwrap();
//! let config = VegasConfig::builder()
//!     .warm_up(200, 2)
//!     .refine(500, 1)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let histogram = run_histogram(&process, &config, Dispatch::Sequential).unwrap();
//! assert_eq!(histogram.rows().len(), 1);
//! ```
//!
//! ## Reproducibility
//!
//! Bin `i` of a run seeded with `s` draws from seed `s + i`, split into
//! independent warm-up and refine streams. Results therefore do not depend
//! on the dispatch policy or the thread count.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bins;
pub mod domain;
pub mod error;
pub mod modes;
pub mod params;
pub mod pipeline;
pub mod process;
pub mod rng;
pub mod sink;
pub mod vegas;

pub use bins::{BinDescriptor, BinResult, BinSampling, Dispatch, IntegrationOutcome, JobError};
pub use error::ConfigError;
pub use modes::ObservableMode;
pub use pipeline::{run_histogram, Histogram, PipelineError};
pub use process::{DileptonProcess, InclusiveJetProcess, Process};
pub use vegas::{NonFinitePolicy, VegasConfig};
