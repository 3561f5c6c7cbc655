// Infrastructure layer - Configuration and adapters to files and the network
pub mod config;
pub mod snapshot;
pub mod weekly_sources;
