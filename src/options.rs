use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "A tool to pack PNG images into a single texture atlas")]
pub struct Options {
    /// PNG files or directories to pack. Directories are searched
    /// recursively for .png files.
    pub inputs: Vec<PathBuf>,

    /// Where to write the composited texture.
    #[structopt(long, default_value = "pngpack.png")]
    pub output: PathBuf,

    /// Where to write the JSON atlas describing each image's placement.
    /// Defaults to the output path with a .json extension.
    #[structopt(long)]
    pub atlas: Option<PathBuf>,

    /// The largest canvas axis that will be attempted, as a power of two.
    /// The default of 13 allows canvases up to 8192x8192 pixels.
    #[structopt(long, default_value = "13")]
    pub max_order: u32,

    /// Override the placement block size instead of deriving it from the
    /// input image dimensions.
    #[structopt(long)]
    pub block_size: Option<u32>,
}

impl Options {
    pub fn atlas_path(&self) -> PathBuf {
        match &self.atlas {
            Some(path) => path.clone(),
            None => self.output.with_extension("json"),
        }
    }
}
