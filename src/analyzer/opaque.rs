//! Categories whose content is never decoded
//!
//! Document, media, archive and binary reports echo size and format and mark
//! every field that would need a real decoder with [`UNSUPPORTED`].

use serde_json::json;

use super::category::Category;
use super::context::FileContext;
use crate::constants::UNSUPPORTED;
use crate::constants::security::EXECUTABLE_EXTENSIONS;
use crate::types::{Result, Section, section};

/// Category-specific structure fields a decoder would fill in
fn unsupported_fields(category: Category) -> &'static [&'static str] {
    match category {
        Category::Document => &["pages", "word_count"],
        Category::Image => &["dimensions", "color_mode"],
        Category::Audio => &["duration", "sample_rate", "channels"],
        Category::Video => &["duration", "resolution", "frame_rate"],
        Category::Archive => &["files_count", "compression_ratio"],
        _ => &[],
    }
}

pub fn structure(category: Category, ctx: &FileContext<'_>) -> Result<Section> {
    let mut out = section(json!({
        "format": ctx.format(),
        "size_bytes": ctx.record.size_bytes,
    }));
    for field in unsupported_fields(category) {
        out.insert((*field).to_string(), json!(UNSUPPORTED));
    }
    if category == Category::Binary {
        out.insert("executable".to_string(), json!(is_executable(ctx)));
    }
    Ok(out)
}

pub fn content(_ctx: &FileContext<'_>) -> Result<Section> {
    Ok(section(json!({ "analysis": UNSUPPORTED })))
}

pub fn quality(_ctx: &FileContext<'_>) -> Result<Section> {
    Ok(section(json!({ "integrity": UNSUPPORTED })))
}

pub fn security(category: Category, ctx: &FileContext<'_>) -> Result<Section> {
    let mut out = section(json!({ "malware_scan_required": true }));
    if category == Category::Binary {
        out.insert("executable".to_string(), json!(is_executable(ctx)));
    }
    Ok(out)
}

fn is_executable(ctx: &FileContext<'_>) -> bool {
    EXECUTABLE_EXTENSIONS.contains(&ctx.record.extension.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::context::AnalyzerOptions;
    use crate::types::FileRecord;

    fn with_ctx<T>(name: &str, f: impl FnOnce(&FileContext<'_>) -> T) -> T {
        let record = FileRecord::from_bytes(name, &[0u8, 1, 2, 3], None);
        let options = AnalyzerOptions::default();
        let ctx = FileContext::new(&record, "", &options);
        f(&ctx)
    }

    #[test]
    fn test_image_structure_marks_dimensions_unsupported() {
        let s = with_ctx("photo.png", |ctx| structure(Category::Image, ctx).unwrap());
        assert_eq!(s["format"], json!("png"));
        assert_eq!(s["size_bytes"], json!(4));
        assert_eq!(s["dimensions"], json!(UNSUPPORTED));
        assert!(!s.contains_key("executable"));
    }

    #[test]
    fn test_binary_executable_flag() {
        let s = with_ctx("setup.exe", |ctx| security(Category::Binary, ctx).unwrap());
        assert_eq!(s["malware_scan_required"], json!(true));
        assert_eq!(s["executable"], json!(true));

        let s = with_ctx("blob.dat", |ctx| security(Category::Binary, ctx).unwrap());
        assert_eq!(s["executable"], json!(false));
    }

    #[test]
    fn test_no_extension_reports_unknown_format() {
        let s = with_ctx("README", |ctx| structure(Category::Binary, ctx).unwrap());
        assert_eq!(s["format"], json!("unknown"));
    }
}
