//! Collects input images, hands their dimensions to the packer, and
//! composites the final texture plus its atlas once a map is found.

use std::{
    collections::BTreeMap,
    io::{self, BufReader, BufWriter, Write},
    path::{self, Path, PathBuf},
};

use fs_err as fs;
use rayon::prelude::*;
use thiserror::Error;
use walkdir::WalkDir;

use blockpack::{MapDefinition, Placement, SourceRect};

use crate::{
    atlas,
    image::{self, DecodeError, Image},
};

#[derive(Debug, Error)]
pub enum PackageError {
    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("couldn't decode {}: {}", path.display(), source)]
    Decode {
        path: PathBuf,
        source: DecodeError,
    },

    #[error("couldn't encode texture: {}", source)]
    Encode {
        #[from]
        source: png::EncodingError,
    },

    #[error("couldn't serialize atlas: {}", source)]
    Atlas {
        #[from]
        source: serde_json::Error,
    },

    #[error("placement tag \"{tag}\" has no corresponding input file")]
    UnknownTag { tag: String },

    #[error("{} changed size after its dimensions were read", path.display())]
    SizeChanged { path: PathBuf },
}

/// One discovered input: the file on disk plus the tag that identifies it in
/// the packing result and the atlas.
#[derive(Debug)]
struct PackInput {
    tag: String,
    path: PathBuf,
}

/// Holds the set of discovered inputs for a single packaging run.
#[derive(Debug)]
pub struct Packager {
    inputs: Vec<PackInput>,
}

impl Packager {
    /// Collects PNG inputs from the given files and directories. Directories
    /// are walked recursively; anything without a `.png` extension is
    /// ignored. Tags are paths relative to `base_dir`, `/`-separated on
    /// every platform.
    pub fn discover(base_dir: PathBuf, input_paths: &[PathBuf]) -> Self {
        let mut inputs = Vec::new();

        for input_path in input_paths {
            if input_path.is_dir() {
                let walker = WalkDir::new(input_path).into_iter().filter_map(|entry| {
                    entry
                        .map_err(|err| log::warn!("Skipping unreadable entry: {}", err))
                        .ok()
                });

                for entry in walker {
                    if entry.file_type().is_file() && has_png_extension(entry.path()) {
                        inputs.push(PackInput {
                            tag: tag_for_path(&base_dir, entry.path()),
                            path: entry.into_path(),
                        });
                    }
                }
            } else {
                inputs.push(PackInput {
                    tag: tag_for_path(&base_dir, input_path),
                    path: input_path.clone(),
                });
            }
        }

        log::trace!("Discovered {} candidate inputs", inputs.len());

        Self { inputs }
    }

    /// Reads the dimensions of every discovered input from its PNG header.
    ///
    /// An unreadable or undecodable file is logged and skipped rather than
    /// failing the run; a file that disappears here simply never reaches the
    /// packer.
    pub fn source_rects(&self) -> Vec<SourceRect> {
        let mut rects = Vec::new();

        for input in &self.inputs {
            let size = fs::File::open(&input.path)
                .map_err(png::DecodingError::from)
                .and_then(|file| image::probe_png(BufReader::new(file)));

            match size {
                Ok(size) => {
                    log::trace!("Input {} is {}x{}", input.tag, size.0, size.1);
                    rects.push(SourceRect::new(input.tag.clone(), size));
                }
                Err(err) => {
                    log::warn!("Failed to read {}; skipping ({})", input.path.display(), err);
                }
            }
        }

        rects
    }

    /// Composites every placed image onto one canvas and writes the texture
    /// and atlas files.
    ///
    /// Decodes run as independent parallel tasks joined before any blitting;
    /// if any of them fails, nothing is written. Blitting itself needs no
    /// coordination because placements never overlap.
    pub fn package(
        &self,
        map: &MapDefinition,
        texture_path: &Path,
        atlas_path: &Path,
    ) -> Result<(), PackageError> {
        let paths_by_tag: BTreeMap<&str, &Path> = self
            .inputs
            .iter()
            .map(|input| (input.tag.as_str(), input.path.as_path()))
            .collect();

        let placements: Vec<(&str, &Placement)> = map.placements().collect();

        let decoded = placements
            .into_par_iter()
            .map(|(tag, placement)| {
                let path = paths_by_tag
                    .get(tag)
                    .copied()
                    .ok_or_else(|| PackageError::UnknownTag {
                        tag: tag.to_owned(),
                    })?;

                log::trace!("Decoding {} for compositing", tag);

                let file = fs::File::open(path)?;
                let image = Image::decode_png(BufReader::new(file)).map_err(|source| {
                    PackageError::Decode {
                        path: path.to_owned(),
                        source,
                    }
                })?;

                // The placement footprint is what guarantees this image's
                // destination is disjoint from every other; a file that
                // changed size since probing would break that.
                if image.size() != placement.size() {
                    return Err(PackageError::SizeChanged {
                        path: path.to_owned(),
                    });
                }

                Ok((placement, image))
            })
            .collect::<Result<Vec<_>, PackageError>>()?;

        let mut canvas = Image::new_empty_rgba8(map.size());
        for (placement, image) in &decoded {
            canvas.blit(image, placement.offset());
        }

        log::info!("Writing texture to {}", texture_path.display());
        let mut texture_file = BufWriter::new(fs::File::create(texture_path)?);
        canvas.encode_png(&mut texture_file)?;
        texture_file.flush()?;

        log::info!("Writing atlas to {}", atlas_path.display());
        let mut atlas_file = BufWriter::new(fs::File::create(atlas_path)?);
        atlas::write_atlas(&mut atlas_file, map)?;
        atlas_file.flush()?;

        Ok(())
    }
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Tags are relative paths with the separator fixed to `/`, so the same
/// inputs produce the same atlas on every platform.
fn tag_for_path(base_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    let displayed = format!("{}", relative.display());

    if path::MAIN_SEPARATOR == '/' {
        displayed
    } else {
        displayed.replace(path::MAIN_SEPARATOR, "/")
    }
}
