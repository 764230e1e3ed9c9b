pub mod client;
#[cfg(test)]
pub mod fake;
pub mod traits;
pub mod types;

pub use client::HttpEstimationApi;
pub use traits::EstimationApi;
