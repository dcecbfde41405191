pub mod settings;

pub use settings::{Network, Settings};
