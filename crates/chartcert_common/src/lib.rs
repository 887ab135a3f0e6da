pub mod diagnostic;
pub mod telemetry;
