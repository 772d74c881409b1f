pub mod arrivals;
pub mod clock;
pub mod distributions;
pub mod ecs;
pub mod error;
pub mod pool;
pub mod profiling;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
pub mod telemetry_export;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
