use tracing_subscriber::EnvFilter;

mod camera;
mod config;
mod frame;
mod preview;
mod record;
mod sink;

use camera::{FrameSource, OpenniSource, FRAME_HEIGHT, FRAME_WIDTH, TARGET_FPS};
use config::Config;
use preview::WindowPreview;
use record::RecordingController;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("irrec=info".parse()?))
        .init();

    let config = Config::load()?;
    tracing::info!(
        base_dir = %config.recording.base_dir.display(),
        segment_secs = config.recording.segment_secs,
        backend = ?config.sink.backend,
        "starting recorder"
    );

    let mut source = OpenniSource::open(&config.camera)?;
    camera::warmup(&mut source, config.recording.warmup_frames)?;

    let mut preview = WindowPreview::create("irrec preview")?;

    let backend = config.sink.backend;
    let codec = config.sink.codec.clone();
    let mut open_sink = move |path: &std::path::Path| {
        sink::open_sink(backend, &codec, path, FRAME_WIDTH, FRAME_HEIGHT, TARGET_FPS)
    };

    let controller = RecordingController::new(
        &config.recording.base_dir,
        config.recording.segment_secs,
        backend.extension(),
    );

    let result = controller.run(&mut source, &mut preview, &mut open_sink);
    source.stop();
    result?;

    tracing::info!("shutdown complete");
    Ok(())
}
