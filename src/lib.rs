mod block;
mod config;
mod document;
mod error;
mod html;
mod markdown;
mod palette;
mod parser;

pub use block::{
    Align, Block, BlockId, BlockKind, Button, ColumnBlock, Columns, Divider, Heading,
    HeadingLevel, IconStyle, Image, Quote, RawHtml, Side, Social, SocialLink, Spacer, Text, Video,
};
pub use config::{AssetsConfig, ButtonConfig, Config, QuoteConfig};
pub use document::{Document, Warning, WarningKind};
pub use error::{ConfigError, DocumentError, InvalidHeadingLevel};
pub use markdown::markdown_to_html;
pub use palette::{DEFAULT_SPACER_HEIGHT, PALETTE, PaletteEntry};

/// Parse email HTML into blocks.
pub fn parse(html: &str) -> Vec<Block> {
    parser::parse(html)
}

/// Render blocks to email HTML with the compiled-in default configuration.
pub fn serialize(blocks: &[Block]) -> String {
    serialize_with_config(blocks, &Config::compiled_default())
}

/// Render blocks to email HTML.
pub fn serialize_with_config(blocks: &[Block], config: &Config) -> String {
    html::blocks_to_html(blocks, config)
}

/// Convert a markdown draft into blocks.
pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    markdown::markdown_to_blocks(markdown)
}
