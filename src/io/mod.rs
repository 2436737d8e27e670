//! Project I/O: configuration, folders, bundling, front-end output and the CLI

/// Bundling of image and metadata pairs into `assets/`
pub mod assets;
/// Command-line interface and stage orchestration
pub mod cli;
/// Defaults and the JSON configuration document
pub mod configuration;
/// Logging context passed to every component
pub mod context;
/// CSV attribute source
pub mod csv_source;
/// Error types and path context
pub mod error;
/// Front-end environment output
pub mod frontend;
/// Terminal progress display
pub mod progress;
/// Project folder layout
pub mod scaffold;
