//! Scroll through a feed of lazily loaded videos
//!
//! Run with `RUST_LOG=debug cargo run -p lazyvid-engine --example feed`.

use std::cell::Cell;
use std::rc::Rc;

use lazyvid_core::{LazyVideo, LazyVideoConfig, VideoSource};
use lazyvid_engine::{DOMRect, Document};
use tracing_subscriber::EnvFilter;

const VIDEOS: usize = 12;
const SPACING: f64 = 480.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config: LazyVideoConfig = serde_json_config()?;
    let document = Document::new(1280.0, 720.0);
    let loaded = Rc::new(Cell::new(0usize));

    let feed: Vec<_> = (0..VIDEOS)
        .map(|i| {
            let video = document.create_video(DOMRect::new(0.0, i as f64 * SPACING, 640.0, 360.0));
            video.set_muted(true);

            let sources = vec![
                VideoSource::webm(format!("/media/{i}.webm")),
                VideoSource::mp4(format!("/media/{i}.mp4")),
            ];
            let lazy = LazyVideo::attach(document.clone(), video.clone(), sources, config.clone());
            let counter = loaded.clone();
            lazy.set_on_loaded(move || counter.set(counter.get() + 1));
            (video, lazy)
        })
        .collect();

    for step in 0..=10 {
        document.scroll_to(0.0, step as f64 * 500.0);
        document.update();
        // Playback watchers created this frame report on the next one
        document.update();

        let playing: Vec<_> = feed
            .iter()
            .enumerate()
            .filter(|(_, (video, _))| !video.is_paused())
            .map(|(i, _)| i)
            .collect();
        tracing::info!(
            "scroll {:>5}px: {} loaded, playing {:?}",
            step * 500,
            loaded.get(),
            playing
        );
    }

    Ok(())
}

/// The same JSON a host page would hand over
fn serde_json_config() -> anyhow::Result<LazyVideoConfig> {
    let config = r#"{ "root_margin": "200px", "pause_on_leave": true }"#;
    Ok(serde_json::from_str(config)?)
}
