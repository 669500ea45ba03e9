//! Cornell box example.
//!
//! Renders the built-in Cornell box progressively on the background render
//! loop and saves the result as PNG.
//!
//! Usage: cargo run --release --example cornell_box -- [passes] [output.png]

use std::time::Duration;

use anyhow::Context;
use chroma_renderer::scene_factory::cornell_box_scene;
use chroma_renderer::{ChromaCore, FrameSink, PngSink, RenderMode, Settings};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let passes: u64 = match args.next() {
        Some(arg) => arg.parse().context("passes must be a positive integer")?,
        None => 64,
    };
    let output = args.next().unwrap_or_else(|| "cornell_box.png".to_string());

    let threads = std::thread::available_parallelism().map_or(4, |n| n.get());
    let settings = Settings::new(512, 512, RenderMode::MonteCarloPathTracer)
        .with_thread_count(threads)
        .with_max_ray_depth(5)
        .with_continuous(true)
        .with_l1_norm(true);

    let mut core = ChromaCore::new(&cornell_box_scene(), settings)?;
    core.start()?;

    if !core.wait_for_frames(passes, Duration::from_secs(3600)) {
        log::warn!("Timed out before {} passes", passes);
    }
    core.shutdown();

    let stats = core.statistics();
    log::info!(
        "{} passes, {:.2} Mrays/s, last pass {:?}, L1 {:?}",
        stats.frames,
        stats.rays_per_second() / 1e6,
        stats.last_pass,
        stats.l1_norm
    );

    let frame = core.current_frame();

    let mut sink = PngSink::new(&output);
    sink.accept(&frame)
        .with_context(|| format!("failed to write {}", output))?;
    Ok(())
}
