//! # Compressor Module
//!
//! Separa le responsabilità del pass di compressione in sottomoduli:
//! - `fan_out`: orchestratore per build (un task per file)
//! - `job`: pipeline streaming per singolo file × codec
//! - `progress_tracker`: progress bar e messaggi per job
//! - `path_resolver`: logica di calcolo path centralizzata

pub mod fan_out;
pub mod job;
pub mod path_resolver;
pub mod progress_tracker;

pub use fan_out::FanOut;
pub use job::CompressionJob;
pub use path_resolver::PathResolver;
pub use progress_tracker::ProgressTracker;
