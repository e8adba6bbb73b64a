//! Per-phase dispatch over the closed [`Category`] set

use super::category::Category;
use super::context::FileContext;
use super::security::KeywordScan;
use super::{code, config_file, data, opaque, text};
use crate::types::{Result, Section};

pub fn structure(category: Category, ctx: &FileContext<'_>) -> Result<Section> {
    match category {
        Category::Code => code::structure(ctx),
        Category::Data => data::structure(ctx),
        Category::Text => text::structure(ctx),
        Category::Config => config_file::structure(ctx),
        Category::Document
        | Category::Image
        | Category::Audio
        | Category::Video
        | Category::Archive
        | Category::Binary => opaque::structure(category, ctx),
    }
}

pub fn content(category: Category, ctx: &FileContext<'_>) -> Result<Section> {
    match category {
        Category::Code => code::content(ctx),
        Category::Data => data::content(ctx),
        Category::Text => text::content(ctx),
        Category::Config => config_file::content(ctx),
        Category::Document
        | Category::Image
        | Category::Audio
        | Category::Video
        | Category::Archive
        | Category::Binary => opaque::content(ctx),
    }
}

pub fn quality(category: Category, ctx: &FileContext<'_>) -> Result<Section> {
    match category {
        Category::Code => code::quality(ctx),
        Category::Data => data::quality(ctx),
        Category::Text => text::quality(ctx),
        Category::Config => config_file::quality(ctx),
        Category::Document
        | Category::Image
        | Category::Audio
        | Category::Video
        | Category::Archive
        | Category::Binary => opaque::quality(ctx),
    }
}

pub fn security(category: Category, ctx: &FileContext<'_>) -> Result<Section> {
    match category {
        Category::Code => code::security(ctx),
        Category::Data => data::security(ctx),
        Category::Text => Ok(KeywordScan::run(ctx.text).to_section()),
        Category::Config => config_file::security(ctx),
        Category::Document
        | Category::Image
        | Category::Audio
        | Category::Video
        | Category::Archive
        | Category::Binary => opaque::security(category, ctx),
    }
}
