use blockpack::{BlockPacker, SourceRect};

fn main() {
    env_logger::init();

    let rects: Vec<_> = (0..5)
        .map(|i| SourceRect::new(format!("sprite-{}", i), (128, 128)))
        .collect();

    let packer = BlockPacker::new().max_order(8);

    match packer.pack(rects) {
        Ok(map) => {
            println!("Canvas: {:?}", map.size());
            for (tag, placement) in map.placements() {
                println!("  {} => {:?} {:?}", tag, placement.offset(), placement.size());
            }
        }
        Err(err) => eprintln!("Packing failed: {}", err),
    }
}
