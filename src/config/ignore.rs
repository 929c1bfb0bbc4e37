//! Ignore pattern files
//!
//! One pattern per line. Lines starting with `//` are comments, blank lines
//! are skipped, everything else is trimmed and kept as a regex.

use crate::ConfigError;
use std::path::Path;

/// Prefix of a comment line
const COMMENT_PREFIX: &str = "//";

/// Extracts ignore patterns from file content
///
/// # Example
///
/// ```
/// use domain_scout::config::parse_ignore_patterns;
///
/// let patterns = parse_ignore_patterns("// social\nfacebook\n\n  twitter  \n");
/// assert_eq!(patterns, vec!["facebook", "twitter"]);
/// ```
pub fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with(COMMENT_PREFIX))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads ignore patterns from a file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Patterns in file order
/// * `Err(ConfigError::IgnoreFile)` - The file could not be read
pub fn load_ignore_patterns(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IgnoreFile {
        path: path.display().to_string(),
        source,
    })?;

    let patterns = parse_ignore_patterns(&content);
    tracing::debug!(
        "Loaded {} ignore patterns from {}",
        patterns.len(),
        path.display()
    );
    Ok(patterns)
}
