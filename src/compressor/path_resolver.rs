//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path dei sorgenti e dei file derivati.

use crate::codec::Codec;
use std::path::{Path, PathBuf};

/// Utility per calcolare i path in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Path of the derived file: the codec suffix is appended, never substituted
    pub fn output_path(source: &Path, codec: Codec) -> PathBuf {
        let mut output = source.as_os_str().to_os_string();
        output.push(codec.suffix());
        PathBuf::from(output)
    }

    /// Resolve a manifest entry against the build's working directory
    pub fn source_path(entry: &str, working_dir: Option<&Path>) -> PathBuf {
        let path = Path::new(entry);
        match working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
