//! Basic synchronization example

use pdsync_core::{packing::BitStreamBuilder, Pipeline, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("pdsync Basic Synchronization Example\n");

    // Build a bit stream carrying three PDS frames
    let mut builder = BitStreamBuilder::new();
    for i in 1..=3u8 {
        let mut frame = [i; 72];
        for slot in 0..3 {
            frame[slot * 24] = 0xD6;
            frame[slot * 24 + 1] = 0x00;
        }
        builder = builder.noise(64).sync_here("pds_sync").bytes(&frame);
    }
    let (bits, events) = builder.build();
    println!("Stream: {} bits, {} sync events", bits.len(), events.len());

    let mut pipeline = Pipeline::new(PipelineConfig::default())?;
    let output = pipeline.run(&bits, &events, 0);

    for frame in &output.frames {
        println!("{}", frame);
    }

    println!(
        "\n{} valid / {} invalid SARP messages",
        output.messages.valid.len(),
        output.messages.invalid.len()
    );

    Ok(())
}
