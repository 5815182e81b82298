//! Source code parsers using tree-sitter
//!
//! Front ends turn a source file into the attribute usages the analyzer
//! consumes. Only C# carries `ManualTechnicalDebt` attributes today.

pub mod csharp;

use crate::extractor::AttributeUsage;
use anyhow::Result;
use std::path::Path;

/// Parse a file and extract every attribute usage
pub fn parse_file(path: &Path) -> Result<ParseResult> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "cs" => csharp::parse(path),
        _ => Ok(ParseResult::default()),
    }
}

/// Get the language name for a file extension
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "cs" => Some("C#"),
        _ => None,
    }
}

/// Get all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["cs"]
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| supported_extensions().contains(&ext))
}

/// Result of parsing a source file
#[derive(Debug, Default, Clone)]
pub struct ParseResult {
    /// Attribute usages in document order
    pub attributes: Vec<AttributeUsage>,

    /// tree-sitter recovered from at least one syntax error
    pub has_syntax_errors: bool,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_unknown_extension_returns_empty() {
        let path = PathBuf::from("test.unknown");
        let result = parse_file(&path).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_cs_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/Debt.cs");
        assert!(parse_file(&path).is_err());
    }

    #[test]
    fn test_language_for_extension() {
        assert_eq!(language_for_extension("cs"), Some("C#"));
        assert_eq!(language_for_extension("rs"), None);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("src/Debt.cs")));
        assert!(!is_supported(Path::new("src/debt.rs")));
        assert!(!is_supported(Path::new("Makefile")));
    }
}
