use anyhow::Result;

mod camera;
mod color;
mod config;
mod geometry;
mod lights;
mod loader;
mod math;
mod model;
mod rendering;
mod room;
mod scene_graph;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = config::AppConfig::from_args(std::env::args().skip(1))?;

    pollster::block_on(window::run(config))?;

    Ok(())
}
