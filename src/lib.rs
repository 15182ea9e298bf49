// Library surface for headless/integration tests and reuse.
// Terminal handling and rendering stay in the binary.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod provider;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod stats;
