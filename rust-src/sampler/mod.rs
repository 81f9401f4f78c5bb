//! Periodic sampling of mobile traffic counters.

mod usage_sampler;

pub use usage_sampler::{rank_consumers, Sampler};
