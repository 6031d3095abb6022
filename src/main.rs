mod atlas;
mod image;
mod options;
mod packager;

use std::{env, error::Error, process};

use blockpack::BlockPacker;
use structopt::StructOpt;

use crate::{options::Options, packager::Packager};

fn main() {
    env_logger::init();

    let options = Options::from_args();

    match run(options) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}

fn run(options: Options) -> Result<(), Box<dyn Error>> {
    let base_dir = env::current_dir()?;

    let packager = Packager::discover(base_dir, &options.inputs);
    let rects = packager.source_rects();

    if rects.is_empty() {
        log::warn!("No readable PNG inputs; nothing to pack");
        return Ok(());
    }

    let mut packer = BlockPacker::new().max_order(options.max_order);
    if let Some(block_size) = options.block_size {
        packer = packer.block_size(block_size);
    }

    let map = packer.pack(rects)?;

    packager.package(&map, &options.output, &options.atlas_path())?;

    Ok(())
}
