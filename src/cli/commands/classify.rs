//! Classify Command
//!
//! Print the category for a path or bare extension without reading the file.

use std::path::Path;

use crate::analyzer::classify;
use crate::types::Result;
use crate::types::record::{guess_mime, normalize_extension};

/// `".py"`, `"py"` and `"src/main.py"` all resolve to the same extension
fn extension_of(target: &str) -> String {
    let normalized = normalize_extension(Path::new(target));
    if !normalized.is_empty() || target.contains(['/', '\\']) {
        normalized
    } else {
        format!(".{}", target.trim_start_matches('.').to_lowercase())
    }
}

pub fn run(target: &str, mime: Option<&str>) -> Result<()> {
    let extension = extension_of(target);
    let mime = match mime {
        Some(m) => Some(m.to_string()),
        None => guess_mime(Path::new(&format!("file{}", extension))),
    };
    let category = classify(&extension, mime.as_deref());

    println!("{}", category);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(".PY"), ".py");
        assert_eq!(extension_of("csv"), ".csv");
        assert_eq!(extension_of("src/Main.RS"), ".rs");
        assert_eq!(extension_of("bin/tool"), "");
        assert_eq!(extension_of("deploy/.env"), ".env");
    }
}
