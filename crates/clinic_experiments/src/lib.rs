//! Parallel experimentation framework for clinic queueing simulations.
//!
//! This crate runs many independent clinic simulations in parallel, either as
//! a grid over staffing and demand parameters or as seeded replications of one
//! configuration, and extracts per-run metrics for comparison.
//!
//! # Quick Start
//!
//! ```no_run
//! use clinic_experiments::{ParameterSpace, run_parallel_experiments, find_shortest_stay_index};
//!
//! // Grid over staffing levels, five replications each
//! let space = ParameterSpace::grid()
//!     .nurse_capacity(vec![2, 3])
//!     .doctor_capacity(vec![1, 2, 3])
//!     .replications(5);
//!
//! let parameter_sets = space.generate();
//! let results = run_parallel_experiments(&parameter_sets, None).unwrap();
//! let best = find_shortest_stay_index(&results).unwrap();
//! println!("best: {}", parameter_sets[best].experiment_id);
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: Parameter variation framework (grid search, random sampling, replications)
//! - [`runner`]: Parallel simulation execution using rayon
//! - [`metrics`]: Metrics extraction and replication summaries
//! - [`export`]: Result export to CSV/JSON

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use export::{export_summaries_to_json, export_to_csv, export_to_json, find_shortest_stay_index};
pub use metrics::{summarize_experiments, ExperimentSummary, SimulationResult};
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::run_parallel_experiments;
