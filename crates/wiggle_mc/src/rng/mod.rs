//! # Random Number Generation
//!
//! Seeded generators for the adaptive sampler.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every bin derives its own seed from the run seed
//!   and its index, so results do not depend on worker scheduling
//! - **Stream separation**: warm-up and refine stages draw from distinct
//!   streams of the same bin seed
//! - **Efficiency**: batch fills into caller-owned `&mut [f64]` buffers
//!
//! ## Module Structure
//!
//! - [`prng`]: [`SamplerRng`] and the seed derivation helpers
//!
//! ## Usage Example
//!
//! ```rust
//! use wiggle_mc::rng::{bin_seed, SamplerRng};
//!
//! let seed = bin_seed(42, 3);
//! let mut rng = SamplerRng::from_seed(seed);
//! let u = rng.gen_uniform();
//! assert!((0.0..1.0).contains(&u));
//! ```

pub mod prng;

pub use prng::{bin_seed, stream_seed, SamplerRng};
