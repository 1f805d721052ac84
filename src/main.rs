mod app;
mod audio;
mod catalog;
mod config;
mod logging;
mod mpris;
mod runtime;
mod storage;
mod ui;
mod visualizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
