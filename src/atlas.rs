//! Serialized form of a packing result.
//!
//! The atlas is the contract other tools parse: a flat JSON object with one
//! entry per tag, each carrying the pixel offset and size of that image
//! within the texture.

use std::{collections::BTreeMap, io::Write};

use serde::Serialize;

use blockpack::MapDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AtlasEntry {
    pub offset: [u32; 2],
    pub size: [u32; 2],
}

pub fn entries(map: &MapDefinition) -> BTreeMap<&str, AtlasEntry> {
    map.placements()
        .map(|(tag, placement)| {
            let (x, y) = placement.offset();
            let (w, h) = placement.size();

            (
                tag,
                AtlasEntry {
                    offset: [x, y],
                    size: [w, h],
                },
            )
        })
        .collect()
}

pub fn write_atlas<W: Write>(writer: W, map: &MapDefinition) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(writer, &entries(map))
}
