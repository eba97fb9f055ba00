mod client;
mod config;

pub use client::QdrantUserStore;
pub use config::QdrantConfig;
