//! Scene demo application
//!
//! Loads a scene configuration (the stock scene when no path is given), runs
//! the session headless at the configured frame rate and logs where the
//! bodies end up.
//!
//! ```text
//! scene_app [path/to/scene.ron]
//! ```

use std::path::PathBuf;
use std::thread;

use frame_sync::foundation::logging;
use frame_sync::prelude::*;
use thiserror::Error;

/// Frames to run when the configuration sets no limit
const DEFAULT_FRAMES: u64 = 600;

/// Frames between position reports
const REPORT_EVERY: u64 = 60;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn load_config() -> Result<SessionConfig, AppError> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = SessionConfig::load_from_file(&path)?;
            log::info!("Loaded scene from {}", path.display());
            Ok(config)
        }
        None => Ok(SessionConfig::default()),
    }
}

fn report(session: &Session, names: &[String]) {
    for name in names {
        if let Some(p) = session.body_position(name) {
            log::info!("{name}: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
        }
    }
}

fn run() -> Result<(), AppError> {
    logging::init_deferred(logging::LevelFilter::Info);
    let config = load_config()?;
    config.validate()?;
    if let Err(e) = logging::set_level(&config.engine.log_level) {
        log::warn!("Keeping info logging: {e}");
    }

    let renderer = HeadlessRenderer::new().with_viewport(config.viewport);
    let mut session = Session::setup(&config, Box::new(renderer))?;

    let dynamic_bodies: Vec<String> = config
        .objects
        .iter()
        .filter(|o| o.body.as_ref().is_some_and(|b| b.kind == BodyKind::Dynamic))
        .map(|o| o.name.clone())
        .collect();

    let frames = config.engine.frame_limit.unwrap_or(DEFAULT_FRAMES);
    let mut timer = Timer::new();
    log::info!("Running {frames} frames");

    for frame in 1..=frames {
        let elapsed = timer.update();
        session.frame(elapsed);

        if frame % REPORT_EVERY == 0 {
            report(&session, &dynamic_bodies);
        }

        if let Some(fps) = config.engine.target_fps {
            if let Some(wait) = timer.remaining_frame_budget(fps) {
                thread::sleep(wait);
            }
        }
    }

    let stats = session.stats();
    log::info!(
        "Done: {} frames, {} physics steps, {:.1} fps, {} assets loaded, {} failed",
        stats.frame,
        stats.total_steps,
        timer.average_fps(),
        session.loaded_assets(),
        session.failed_assets()
    );
    report(&session, &dynamic_bodies);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("scene_app: {e}");
        std::process::exit(1);
    }
}
