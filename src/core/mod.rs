pub mod clock;
pub mod component;
pub mod distributions;
pub mod environment;
pub mod error;
pub mod event_scheduler;
pub mod monitor;
pub mod queue;
pub mod replication;
pub mod resource;
pub mod trace;
pub mod types;

#[cfg(test)]
mod tests;
