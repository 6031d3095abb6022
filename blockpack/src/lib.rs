//! Blockpack is a small library for packing uniquely-tagged rectangles onto a
//! single power-of-two canvas. It was built for pngpack, a tool that stitches
//! a set of PNG images into one texture atlas.
//!
//! The packer quantizes every rectangle to a common block unit (the GCD of
//! all input dimensions) and then searches over growing canvas sizes, placing
//! rectangles first-fit in block space. Each canvas axis is an independent
//! power of two, so the search walks through intermediate aspect ratios
//! before doubling total area.
//!
//! ## Example
//! ```
//! use blockpack::{BlockPacker, SourceRect};
//!
//! // Tag each rectangle you want to pack. Tags must be unique; they key the
//! // resulting placements.
//! let rects = vec![
//!     SourceRect::new("ui/button", (128, 64)),
//!     SourceRect::new("ui/panel", (64, 64)),
//!     SourceRect::new("ui/divider", (4, 300)),
//! ];
//!
//! // Construct a packer, configure its search bound, and compute a map.
//! let map = BlockPacker::new().max_order(9).pack(rects).unwrap();
//!
//! for (tag, placement) in map.placements() {
//!     println!("{} => {:?}", tag, placement.offset());
//! }
//! ```

mod error;
mod grid;
mod packer;
mod quantize;
mod types;

pub use error::*;
pub use packer::*;
pub use quantize::block_size;
pub use types::*;
