use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockId, ColumnBlock, Side};
use crate::config::Config;
use crate::error::DocumentError;
use crate::html;

/// An email body: top-level blocks in rendering order.
///
/// Serializes as a plain JSON array of blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    blocks: Vec<Block>,
}

/// Where a block id lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Top(usize),
    Zone {
        columns: usize,
        side: Side,
        index: usize,
    },
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append a block. Fails if any of its ids is already taken.
    pub fn push(&mut self, block: Block) -> Result<(), DocumentError> {
        self.check_ids(&block.ids(), &[])?;
        self.blocks.push(block);
        Ok(())
    }

    /// Insert at `index`, clamped to the end of the document. Fails if any of
    /// the block's ids is already taken.
    pub fn insert(&mut self, index: usize, block: Block) -> Result<(), DocumentError> {
        self.check_ids(&block.ids(), &[])?;
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
        Ok(())
    }

    /// `incoming` must not repeat an id, nor reuse one held in the document
    /// outside of `replaced`.
    fn check_ids(&self, incoming: &[&BlockId], replaced: &[&BlockId]) -> Result<(), DocumentError> {
        let taken: HashSet<&BlockId> = self
            .blocks
            .iter()
            .flat_map(|block| block.ids())
            .filter(|id| !replaced.iter().any(|r| r == id))
            .collect();
        let mut seen = HashSet::new();
        for &id in incoming {
            if taken.contains(id) || !seen.insert(id) {
                return Err(DocumentError::DuplicateId(id.clone()));
            }
        }
        Ok(())
    }

    fn locate(&self, id: &BlockId) -> Option<Location> {
        for (i, block) in self.blocks.iter().enumerate() {
            if block.id() == id {
                return Some(Location::Top(i));
            }
            if let Block::Columns(columns) = block {
                for side in Side::BOTH {
                    if let Some(index) = columns.zone(side).iter().position(|b| b.id() == id) {
                        return Some(Location::Zone {
                            columns: i,
                            side,
                            index,
                        });
                    }
                }
            }
        }
        None
    }

    fn zone_mut(&mut self, columns: usize, side: Side) -> Option<&mut Vec<ColumnBlock>> {
        match self.blocks.get_mut(columns) {
            Some(Block::Columns(columns)) => Some(columns.zone_mut(side)),
            _ => None,
        }
    }

    /// True if any block, nested ones included, has this id.
    pub fn contains(&self, id: &BlockId) -> bool {
        self.locate(id).is_some()
    }

    /// Top-level block with this id.
    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    /// Block with this id inside a columns zone, with the zone's side.
    pub fn find_in_columns(&self, id: &BlockId) -> Option<(Side, &ColumnBlock)> {
        match self.locate(id)? {
            Location::Zone {
                columns,
                side,
                index,
            } => match &self.blocks[columns] {
                Block::Columns(c) => c.zone(side).get(index).map(|block| (side, block)),
                _ => None,
            },
            Location::Top(_) => None,
        }
    }

    /// Replace the block that has the same id as `block`, wherever it lives.
    pub fn replace(&mut self, block: Block) -> Result<(), DocumentError> {
        let id = block.id().clone();
        match self.locate(&id).ok_or(DocumentError::NotFound(id))? {
            Location::Top(i) => {
                self.check_ids(&block.ids(), &self.blocks[i].ids())?;
                self.blocks[i] = block;
            }
            Location::Zone {
                columns,
                side,
                index,
            } => {
                let block = ColumnBlock::try_from(block)
                    .map_err(|nested| DocumentError::NestedColumns(nested.id))?;
                if let Some(zone) = self.zone_mut(columns, side) {
                    zone[index] = block;
                }
            }
        }
        Ok(())
    }

    /// Remove a block by id, wherever it lives.
    pub fn remove(&mut self, id: &BlockId) -> Option<Block> {
        match self.locate(id)? {
            Location::Top(i) => Some(self.blocks.remove(i)),
            Location::Zone {
                columns,
                side,
                index,
            } => self
                .zone_mut(columns, side)
                .map(|zone| zone.remove(index).into()),
        }
    }

    /// Copy a block with fresh ids right after the original. Returns the copy's id.
    pub fn duplicate(&mut self, id: &BlockId) -> Result<BlockId, DocumentError> {
        match self
            .locate(id)
            .ok_or_else(|| DocumentError::NotFound(id.clone()))?
        {
            Location::Top(i) => {
                let copy = self.blocks[i].with_fresh_ids();
                let new_id = copy.id().clone();
                self.blocks.insert(i + 1, copy);
                Ok(new_id)
            }
            Location::Zone {
                columns,
                side,
                index,
            } => {
                let zone = self
                    .zone_mut(columns, side)
                    .ok_or_else(|| DocumentError::NotFound(id.clone()))?;
                let copy = zone[index].with_fresh_ids();
                let new_id = copy.id().clone();
                zone.insert(index + 1, copy);
                Ok(new_id)
            }
        }
    }

    /// Move a top-level block to `to_index`, clamped to the end.
    pub fn move_block(&mut self, id: &BlockId, to_index: usize) -> Result<(), DocumentError> {
        let from = self
            .blocks
            .iter()
            .position(|block| block.id() == id)
            .ok_or_else(|| DocumentError::NotFound(id.clone()))?;
        let block = self.blocks.remove(from);
        let index = to_index.min(self.blocks.len());
        self.blocks.insert(index, block);
        Ok(())
    }

    /// Insert into one zone of the columns block `columns_id`, clamped to the zone's end.
    pub fn insert_into_column(
        &mut self,
        columns_id: &BlockId,
        side: Side,
        index: usize,
        block: ColumnBlock,
    ) -> Result<(), DocumentError> {
        self.check_ids(&[block.id()], &[])?;
        let target = self
            .blocks
            .iter_mut()
            .find(|b| b.id() == columns_id)
            .ok_or_else(|| DocumentError::NotFound(columns_id.clone()))?;
        let Block::Columns(columns) = target else {
            return Err(DocumentError::NotColumns(columns_id.clone()));
        };
        let zone = columns.zone_mut(side);
        let index = index.min(zone.len());
        zone.insert(index, block);
        Ok(())
    }

    /// Check that every id, nested ones included, is unique.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::new();
        for block in &self.blocks {
            for id in block.ids() {
                if !seen.insert(id) {
                    return Err(DocumentError::DuplicateId(id.clone()));
                }
            }
        }
        Ok(())
    }

    /// Content problems an editor should surface before sending.
    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Columns(columns) => {
                    for child in columns.left.iter().chain(&columns.right) {
                        column_block_warnings(child, &mut warnings);
                    }
                }
                Block::Image(image) => {
                    image_warnings(&image.id, &image.src, &image.alt, &mut warnings)
                }
                Block::Video(video) => {
                    video_warnings(&video.id, &video.video_url, &video.alt, &mut warnings)
                }
                Block::Button(button) => button_warnings(&button.id, &button.url, &mut warnings),
                _ => {}
            }
        }
        warnings
    }

    pub fn to_html(&self, config: &Config) -> String {
        html::blocks_to_html(&self.blocks, config)
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self::from_blocks(blocks)
    }
}

fn column_block_warnings(block: &ColumnBlock, warnings: &mut Vec<Warning>) {
    match block {
        ColumnBlock::Image(image) => image_warnings(&image.id, &image.src, &image.alt, warnings),
        ColumnBlock::Video(video) => {
            video_warnings(&video.id, &video.video_url, &video.alt, warnings)
        }
        ColumnBlock::Button(button) => button_warnings(&button.id, &button.url, warnings),
        _ => {}
    }
}

fn image_warnings(id: &BlockId, src: &str, alt: &str, warnings: &mut Vec<Warning>) {
    if src.trim().is_empty() {
        warnings.push(Warning::new(id, WarningKind::MissingImage));
    }
    if alt.trim().is_empty() {
        warnings.push(Warning::new(id, WarningKind::MissingAlt));
    }
}

fn video_warnings(id: &BlockId, url: &str, alt: &str, warnings: &mut Vec<Warning>) {
    if is_placeholder_url(url) {
        warnings.push(Warning::new(id, WarningKind::MissingUrl));
    }
    if alt.trim().is_empty() {
        warnings.push(Warning::new(id, WarningKind::MissingAlt));
    }
}

fn button_warnings(id: &BlockId, url: &str, warnings: &mut Vec<Warning>) {
    if is_placeholder_url(url) {
        warnings.push(Warning::new(id, WarningKind::MissingUrl));
    }
}

fn is_placeholder_url(url: &str) -> bool {
    matches!(url.trim(), "" | "https://" | "http://")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MissingAlt,
    MissingImage,
    MissingUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub block: BlockId,
    pub kind: WarningKind,
}

impl Warning {
    fn new(block: &BlockId, kind: WarningKind) -> Self {
        Self {
            block: block.clone(),
            kind,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.kind {
            WarningKind::MissingAlt => "has no alt text",
            WarningKind::MissingImage => "has no image selected",
            WarningKind::MissingUrl => "has no link",
        };
        write!(f, "block `{}` {}", self.block, message)
    }
}
