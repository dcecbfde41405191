// App-specific modules
pub mod config;
pub mod owners;
pub mod pipeline;
pub mod pool;
