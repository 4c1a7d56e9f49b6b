pub mod fetch;

pub use fetch::FetchTelemetry;
