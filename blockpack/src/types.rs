use std::collections::BTreeMap;

/// An input to the packing routine.
///
/// `SourceRect` is a 2D pixel size plus a caller-supplied tag. Tags must be
/// unique across one packing run; they are how placements in the output map
/// back to the caller's own objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRect {
    pub(crate) tag: String,
    pub(crate) size: (u32, u32),
}

impl SourceRect {
    #[inline]
    pub fn new<T: Into<String>>(tag: T, size: (u32, u32)) -> Self {
        Self {
            tag: tag.into(),
            size,
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The longer of the rectangle's two sides; the packer sorts on this.
    pub(crate) fn max_side(&self) -> u32 {
        self.size.0.max(self.size.1)
    }

    /// Size in whole blocks, rounding each axis up.
    pub(crate) fn size_in_blocks(&self, block_size: u32) -> (u32, u32) {
        (
            ceil_div(self.size.0, block_size),
            ceil_div(self.size.1, block_size),
        )
    }
}

pub(crate) fn ceil_div(value: u32, divisor: u32) -> u32 {
    (value + divisor - 1) / divisor
}

/// Where one rectangle ended up on the canvas.
///
/// Offsets are pixel coordinates of the top-left corner. `size` is the
/// rectangle's true pixel size, not its block-rounded footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub(crate) offset: (u32, u32),
    pub(crate) size: (u32, u32),
}

impl Placement {
    #[inline]
    pub fn offset(&self) -> (u32, u32) {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn min(&self) -> (u32, u32) {
        self.offset
    }

    #[inline]
    pub fn max(&self) -> (u32, u32) {
        (self.offset.0 + self.size.0, self.offset.1 + self.size.1)
    }
}

/// The complete result of a packing run: the canvas size in pixels plus one
/// placement per input tag.
///
/// The tag map is ordered so that iteration, and anything serialized from it,
/// is deterministic. An empty input produces `size == (0, 0)` and no
/// placements; that's a success, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapDefinition {
    pub(crate) size: (u32, u32),
    pub(crate) placements: BTreeMap<String, Placement>,
}

impl MapDefinition {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn placements(&self) -> impl Iterator<Item = (&str, &Placement)> {
        self.placements.iter().map(|(tag, p)| (tag.as_str(), p))
    }

    #[inline]
    pub fn get(&self, tag: &str) -> Option<&Placement> {
        self.placements.get(tag)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
