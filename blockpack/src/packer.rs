use std::collections::{BTreeMap, HashSet};

use crate::{
    error::PackError,
    grid::BlockGrid,
    quantize,
    types::{ceil_div, MapDefinition, Placement, SourceRect},
};

/// The largest canvas axis attempted by default: `2^13` = 8192 pixels.
pub const DEFAULT_MAX_ORDER: u32 = 13;

/// The largest order the search will ever accept. Canvas axes are u32 pixel
/// counts, so orders past 31 are not representable; `max_order` clamps to
/// this.
pub const MAX_CANVAS_ORDER: u32 = 31;

/// Packs tagged rectangles onto a power-of-two canvas using block-quantized
/// first-fit placement.
///
/// The canvas starts small and its two axes grow independently: whenever an
/// attempt fails, the axis that is not ahead of the other gets one more power
/// of two (on ties, the x axis). Growing one axis at a time walks through
/// intermediate aspect ratios before total area doubles, which tends to find
/// tighter canvases at the cost of extra attempts.
///
/// Within one attempt there is no backtracking. Each rectangle takes the
/// first free anchor found scanning rows top to bottom, left to right; if any
/// rectangle fails to fit, the whole attempt is discarded and the search
/// moves to the next canvas size.
#[derive(Debug, Clone)]
pub struct BlockPacker {
    max_order: u32,
    block_size: Option<u32>,
}

impl Default for BlockPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockPacker {
    pub fn new() -> Self {
        Self {
            max_order: DEFAULT_MAX_ORDER,
            block_size: None,
        }
    }

    /// Bounds the search: no canvas axis will ever exceed `2^max_order`
    /// pixels. Values above [`MAX_CANVAS_ORDER`] are clamped to it, since a
    /// canvas axis must fit in a u32.
    pub fn max_order(mut self, max_order: u32) -> Self {
        self.max_order = max_order.min(MAX_CANVAS_ORDER);
        self
    }

    /// Overrides the quantizer with a fixed block size instead of deriving
    /// one from the input dimensions. Dimensions that are not multiples of
    /// the block round their footprint up, so placements stay disjoint
    /// either way.
    pub fn block_size(mut self, block_size: u32) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Computes a placement for every rectangle, or fails for the whole set.
    ///
    /// Succeeding means every input tag appears in the result exactly once
    /// and no two placements overlap. An empty input is a trivial success
    /// with a zero-sized canvas. The result is deterministic for a given
    /// input order: rectangles are sorted by descending longer side with a
    /// stable sort, so ties keep their input order.
    pub fn pack<I: IntoIterator<Item = SourceRect>>(
        &self,
        rects: I,
    ) -> Result<MapDefinition, PackError> {
        let mut rects: Vec<_> = rects.into_iter().collect();

        if rects.is_empty() {
            return Ok(MapDefinition::default());
        }

        let mut seen = HashSet::new();
        for rect in &rects {
            if !seen.insert(rect.tag()) {
                return Err(PackError::DuplicateTag {
                    tag: rect.tag().to_owned(),
                });
            }
        }

        let block_size = match self.block_size {
            Some(size) => size,
            // The set is non-empty, so the quantizer always has an answer.
            None => quantize::block_size(&rects).unwrap_or(1),
        };

        // Large rectangles are the hardest to place; putting them first
        // surfaces a doomed canvas before any small rectangles are committed.
        rects.sort_by(|a, b| b.max_side().cmp(&a.max_side()));

        log::trace!(
            "Packing {} rects with block size {} within order {}",
            rects.len(),
            block_size,
            self.max_order
        );

        let mut growth = GrowthState::new();

        loop {
            let canvas = growth.canvas_size();

            // A canvas must span at least one block per axis before placement
            // is worth attempting.
            if canvas.0 < block_size || canvas.1 < block_size {
                growth.bump(self.max_order)?;
                continue;
            }

            let grid_size = (
                ceil_div(canvas.0, block_size),
                ceil_div(canvas.1, block_size),
            );

            log::trace!(
                "Attempting {}x{} canvas ({}x{} blocks)",
                canvas.0,
                canvas.1,
                grid_size.0,
                grid_size.1
            );

            match Self::pack_attempt(&rects, block_size, grid_size) {
                Some(placements) => {
                    log::trace!("Packed all {} rects at {}x{}", rects.len(), canvas.0, canvas.1);

                    return Ok(MapDefinition {
                        size: canvas,
                        placements,
                    });
                }
                None => growth.bump(self.max_order)?,
            }
        }
    }

    /// Tries to place every rectangle on one fixed-size grid. Returns the
    /// completed placement map, or `None` if any rectangle found no anchor;
    /// partial progress is discarded with the grid.
    fn pack_attempt(
        rects: &[SourceRect],
        block_size: u32,
        grid_size: (u32, u32),
    ) -> Option<BTreeMap<String, Placement>> {
        let mut grid = BlockGrid::new(grid_size.0, grid_size.1);
        let mut placements = BTreeMap::new();

        for (index, rect) in rects.iter().enumerate() {
            let blocks = rect.size_in_blocks(block_size);

            let anchor = match grid.first_fit(blocks.0, blocks.1) {
                Some(anchor) => anchor,
                None => {
                    log::trace!(
                        "No anchor for \"{}\" ({}x{} blocks); abandoning attempt",
                        rect.tag(),
                        blocks.0,
                        blocks.1
                    );
                    return None;
                }
            };

            grid.mark(anchor, blocks.0, blocks.1, index);

            placements.insert(
                rect.tag().to_owned(),
                Placement {
                    offset: (anchor.0 * block_size, anchor.1 * block_size),
                    size: rect.size(),
                },
            );
        }

        Some(placements)
    }
}

/// The canvas-growth counters for one packing run.
///
/// Both axes start at order 1. `bump` advances whichever axis is not ahead of
/// the other, preferring x on ties, so the order sequence runs
/// (1,1) → (2,1) → (2,2) → (3,2) → (3,3) → …
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GrowthState {
    order_x: u32,
    order_y: u32,
}

impl GrowthState {
    pub fn new() -> Self {
        Self {
            order_x: 1,
            order_y: 1,
        }
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (1 << self.order_x, 1 << self.order_y)
    }

    /// Grows the canvas by one step, or reports exhaustion once the bumped
    /// axis would pass `max_order`.
    pub fn bump(&mut self, max_order: u32) -> Result<(), PackError> {
        let bumped = if self.order_x == self.order_y {
            self.order_x += 1;
            self.order_x
        } else {
            self.order_y += 1;
            self.order_y
        };

        if bumped > max_order {
            log::trace!("Growth exhausted at order {}", bumped);
            return Err(PackError::CanvasExceeded { max_order });
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn is_pow2(value: u32) -> bool {
        value != 0 && value & (value - 1) == 0
    }

    /// Block-space footprints of two placements must not share any cell.
    fn overlaps(a: &Placement, b: &Placement) -> bool {
        let (a_min, a_max) = (a.min(), a.max());
        let (b_min, b_max) = (b.min(), b.max());

        a_min.0 < b_max.0 && b_min.0 < a_max.0 && a_min.1 < b_max.1 && b_min.1 < a_max.1
    }

    fn assert_valid(map: &MapDefinition, rects: &[SourceRect], max_order: u32) {
        assert_eq!(map.len(), rects.len());

        for rect in rects {
            let placement = map
                .get(rect.tag())
                .unwrap_or_else(|| panic!("missing tag {}", rect.tag()));
            assert_eq!(placement.size(), rect.size());

            let max = placement.max();
            assert!(max.0 <= map.size().0 && max.1 <= map.size().1);
        }

        assert!(is_pow2(map.size().0) && is_pow2(map.size().1));
        assert!(map.size().0 <= 1 << max_order);
        assert!(map.size().1 <= 1 << max_order);

        let placements: Vec<_> = map.placements().collect();
        for (i, (_, a)) in placements.iter().enumerate() {
            for (_, b) in placements.iter().skip(i + 1) {
                assert!(!overlaps(a, b));
            }
        }
    }

    #[test]
    fn empty_input_is_trivial_success() {
        let map = BlockPacker::new().pack(Vec::new()).unwrap();

        assert_eq!(map.size(), (0, 0));
        assert!(map.is_empty());
    }

    #[test]
    fn duplicate_tags_fail_before_packing() {
        let rects = vec![
            SourceRect::new("a", (8, 8)),
            SourceRect::new("b", (8, 8)),
            SourceRect::new("a", (4, 4)),
        ];

        let err = BlockPacker::new().pack(rects).unwrap_err();
        assert_eq!(
            err,
            PackError::DuplicateTag {
                tag: "a".to_owned()
            }
        );
    }

    #[test]
    fn packs_worked_example_on_16x16() {
        let rects = vec![
            SourceRect::new("a", (8, 8)),
            SourceRect::new("b", (8, 8)),
            SourceRect::new("c", (4, 4)),
        ];

        let map = BlockPacker::new().max_order(4).pack(rects.clone()).unwrap();

        assert_valid(&map, &rects, 4);
        assert_eq!(map.size(), (16, 16));

        // First-fit with a stable descending sort pins the exact layout.
        assert_eq!(map.get("a").unwrap().offset(), (0, 0));
        assert_eq!(map.get("b").unwrap().offset(), (8, 0));
        assert_eq!(map.get("c").unwrap().offset(), (0, 8));
    }

    #[test]
    fn placements_are_disjoint_for_awkward_sizes() {
        // Coprime dimensions force block size 1, the worst case for the
        // search. 100 px of stacked strips plus odd squares still fit in 128.
        let rects = vec![
            SourceRect::new("strip-a", (100, 3)),
            SourceRect::new("strip-b", (100, 7)),
            SourceRect::new("square", (33, 33)),
            SourceRect::new("pixel", (1, 1)),
        ];

        let map = BlockPacker::new().max_order(8).pack(rects.clone()).unwrap();
        assert_valid(&map, &rects, 8);
    }

    #[test]
    fn oversized_rect_exhausts_search() {
        let rects = vec![SourceRect::new("wide", (64, 4))];

        let err = BlockPacker::new().max_order(4).pack(rects).unwrap_err();
        assert_eq!(err, PackError::CanvasExceeded { max_order: 4 });
    }

    #[test]
    fn too_many_rects_exhaust_search() {
        // 5 rects of 16x16 cannot share a 16x16 canvas.
        let rects: Vec<_> = (0..5)
            .map(|i| SourceRect::new(format!("r{}", i), (16, 16)))
            .collect();

        let err = BlockPacker::new().max_order(4).pack(rects).unwrap_err();
        assert_eq!(err, PackError::CanvasExceeded { max_order: 4 });
    }

    #[test]
    fn repacking_is_deterministic() {
        let rects = vec![
            SourceRect::new("a", (12, 4)),
            SourceRect::new("b", (4, 12)),
            SourceRect::new("c", (8, 8)),
            SourceRect::new("d", (4, 4)),
        ];

        let packer = BlockPacker::new().max_order(6);
        let first = packer.pack(rects.clone()).unwrap();
        let second = packer.pack(rects).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn block_size_override_is_respected() {
        let rects = vec![
            SourceRect::new("a", (10, 10)),
            SourceRect::new("b", (10, 10)),
        ];

        // Block 16 rounds both footprints up to one block each.
        let map = BlockPacker::new()
            .max_order(5)
            .block_size(16)
            .pack(rects.clone())
            .unwrap();

        assert_valid(&map, &rects, 5);

        for (_, placement) in map.placements() {
            assert_eq!(placement.offset().0 % 16, 0);
            assert_eq!(placement.offset().1 % 16, 0);
        }
    }

    #[test]
    fn block_size_larger_than_bound_exhausts() {
        // Every canvas up to 2^3 = 8 px is smaller than one 16 px block, so
        // the pre-placement growth path must hit the bound on its own.
        let rects = vec![SourceRect::new("a", (16, 16))];

        let err = BlockPacker::new().max_order(3).pack(rects).unwrap_err();
        assert_eq!(err, PackError::CanvasExceeded { max_order: 3 });
    }

    #[test]
    fn huge_block_size_hits_growth_bound_without_overflow() {
        // Every canvas a u32 axis can express is smaller than this block, so
        // the grid-too-small path must walk the orders all the way up and
        // stop cleanly at the cap.
        let rects = vec![SourceRect::new("a", (16, 16))];

        let err = BlockPacker::new()
            .max_order(40)
            .block_size(3_000_000_000)
            .pack(rects)
            .unwrap_err();

        assert_eq!(err, PackError::CanvasExceeded { max_order: 31 });
    }

    #[test]
    fn max_order_clamps_to_representable_shift() {
        let rects = vec![SourceRect::new("huge", (u32::MAX, u32::MAX))];

        let err = BlockPacker::new()
            .max_order(u32::MAX)
            .pack(rects)
            .unwrap_err();

        assert_eq!(err, PackError::CanvasExceeded { max_order: 31 });
    }

    #[test]
    fn growth_alternates_axes_starting_with_x() {
        let mut growth = GrowthState::new();
        assert_eq!(growth.canvas_size(), (2, 2));

        growth.bump(10).unwrap();
        assert_eq!(growth.canvas_size(), (4, 2));

        growth.bump(10).unwrap();
        assert_eq!(growth.canvas_size(), (4, 4));

        growth.bump(10).unwrap();
        assert_eq!(growth.canvas_size(), (8, 4));
    }

    #[test]
    fn growth_exhausts_past_max_order() {
        let mut growth = GrowthState::new();

        growth.bump(2).unwrap();
        growth.bump(2).unwrap();
        assert_eq!(growth.canvas_size(), (4, 4));

        assert_eq!(
            growth.bump(2),
            Err(PackError::CanvasExceeded { max_order: 2 })
        );
    }
}
