//! # Exclusion Filter Module
//!
//! Compila i pattern `excludes` una sola volta per build e decide, file per file,
//! se un output deve essere saltato.
//!
//! ## Semantica:
//! - Glob standard (`*`, `**`, `?`, classi `[...]`, gruppi `{a,b}`)
//! - `*` non attraversa i separatori di path
//! - Un pattern senza `/` vale a qualsiasi profondità (`*.map` esclude `out/app.css.map`)
//! - Un file è escluso se almeno un pattern corrisponde (OR, short-circuit)
//! - Nessun pattern = nessun file escluso

use crate::error::{CompressError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// A compiled exclude pattern
#[derive(Debug, Clone)]
struct ExcludePredicate {
    pattern: String,
    matcher: GlobMatcher,
}

/// Predicates compiled from `excludes`, valid for one build completion
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    predicates: Vec<ExcludePredicate>,
}

impl ExclusionFilter {
    /// Compile every pattern. The first malformed pattern aborts compilation
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let predicates = patterns
            .iter()
            .map(|pattern| Self::compile_pattern(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { predicates })
    }

    fn compile_pattern(pattern: &str) -> Result<ExcludePredicate> {
        let expanded = if pattern.contains('/') {
            pattern.to_string()
        } else {
            format!("**/{}", pattern)
        };

        let glob = GlobBuilder::new(&expanded)
            .literal_separator(true)
            .build()
            .map_err(|source| CompressError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(ExcludePredicate {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// Pattern that excludes `path`, if any
    pub fn matching_pattern(&self, path: &Path) -> Option<&str> {
        self.predicates
            .iter()
            .find(|predicate| predicate.matcher.is_match(path))
            .map(|predicate| predicate.pattern.as_str())
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.matching_pattern(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> ExclusionFilter {
        ExclusionFilter::compile(patterns).unwrap()
    }

    #[test]
    fn test_empty_excludes_nothing() {
        let filter = filter(&[]);
        assert!(filter.is_empty());
        assert!(!filter.is_excluded(Path::new("out/app.js")));
        assert!(!filter.is_excluded(Path::new("out/app.css.map")));
    }

    #[test]
    fn test_basename_pattern_matches_at_any_depth() {
        let filter = filter(&["*.map"]);
        assert!(filter.is_excluded(Path::new("out/app.css.map")));
        assert!(filter.is_excluded(Path::new("app.js.map")));
        assert!(!filter.is_excluded(Path::new("out/app.js")));
    }

    #[test]
    fn test_path_pattern_respects_separators() {
        let filter = filter(&["out/*.js"]);
        assert!(filter.is_excluded(Path::new("out/app.js")));
        assert!(!filter.is_excluded(Path::new("out/chunks/app.js")));

        let recursive = self::filter(&["out/**/*.js"]);
        assert!(recursive.is_excluded(Path::new("out/chunks/app.js")));
    }

    #[test]
    fn test_braces_and_classes() {
        let filter = filter(&["*.{png,jpg}", "chunk-[0-9].js"]);
        assert!(filter.is_excluded(Path::new("out/logo.png")));
        assert!(filter.is_excluded(Path::new("out/photo.jpg")));
        assert!(filter.is_excluded(Path::new("out/chunk-3.js")));
        assert!(!filter.is_excluded(Path::new("out/chunk-a.js")));
    }

    #[test]
    fn test_any_pattern_excludes() {
        let filter = filter(&["*.map", "*.txt"]);
        assert_eq!(filter.len(), 2);
        assert_eq!(filter.matching_pattern(Path::new("out/LICENSE.txt")), Some("*.txt"));
        assert_eq!(filter.matching_pattern(Path::new("out/app.js.map")), Some("*.map"));
        assert_eq!(filter.matching_pattern(Path::new("out/app.js")), None);
    }

    #[test]
    fn test_malformed_pattern_is_an_error() {
        let err = ExclusionFilter::compile(&["*.js", "out/[a-"]).unwrap_err();
        match err {
            CompressError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "out/[a-"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
