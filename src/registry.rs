use std::path::Path;

use crate::error::Error;
use crate::model::ContentBlock;

/// Ordered card geometry, top to bottom, as supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockRegistry {
    blocks: Vec<ContentBlock>,
}

impl BlockRegistry {
    /// Zero-height cards are rejected; order is kept as given.
    pub fn new(blocks: Vec<ContentBlock>) -> Result<Self, Error> {
        if let Some(i) = blocks.iter().position(|b| b.height_px == 0) {
            return Err(Error::Configuration(format!("card {i} has zero height")));
        }
        Ok(Self { blocks })
    }

    pub fn from_pairs(pairs: &[(u32, u32)]) -> Result<Self, Error> {
        Self::new(
            pairs
                .iter()
                .map(|&(top, height)| ContentBlock::new(top, height))
                .collect(),
        )
    }

    /// Cards stacked from the top of the surface with `gap_px` between them.
    pub fn stacked(heights: &[u32], gap_px: u32) -> Result<Self, Error> {
        let mut top = 0u32;
        let mut blocks = Vec::with_capacity(heights.len());
        for &h in heights {
            blocks.push(ContentBlock::new(top, h));
            top = top.saturating_add(h).saturating_add(gap_px);
        }
        Self::new(blocks)
    }

    /// JSON array of `{"top_offset_px": .., "height_px": ..}` objects.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let blocks: Vec<ContentBlock> = serde_json::from_str(json)?;
        Self::new(blocks)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Bottom edge of the lowest card, in surface pixels.
    pub fn extent_px(&self) -> u64 {
        self.blocks.iter().map(ContentBlock::bottom_px).max().unwrap_or(0)
    }
}
