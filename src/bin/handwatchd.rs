//! handwatchd - hand/person overlap monitor daemon
//!
//! This daemon:
//! 1. Loads configuration (JSON file + environment overrides)
//! 2. Loads both detector models once at startup (fatal on failure)
//! 3. Acquires the camera and runs the capture/detect/fuse worker
//! 4. Logs per-frame side effects (beeps, evidence screenshots)
//! 5. Stops cleanly on Ctrl-C, releasing the camera

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;

use handwatch::{
    Annotator, CameraSource, HandLocator, Monitor, MonitorConfig, OverlapEngine, PersonDetector,
    ScreenshotStore, SideEffect,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Camera device path, or "stub://name" for synthetic frames.
    #[arg(long)]
    device: Option<String>,
    /// Evidence screenshot directory.
    #[arg(long)]
    screenshots: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = MonitorConfig::load()?;
    if let Some(device) = args.device {
        cfg.camera.device = device;
    }
    if let Some(dir) = args.screenshots {
        cfg.screenshot_dir = dir;
    }

    // Model loading is the fatal part: abort before entering the loop.
    let (hands, persons) = build_backends(&cfg)?;
    let sink = build_sink();
    let store = ScreenshotStore::new(&cfg.screenshot_dir)?;
    let annotator = Annotator::new(cfg.font_path.as_deref());

    let engine = OverlapEngine::new(hands, persons, sink, store, annotator)
        .with_alert_interval(cfg.alert_interval_secs);
    let camera = CameraSource::new(cfg.camera.clone())?;
    let frame_interval = if cfg.camera.target_fps == 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(1_000 / cfg.camera.target_fps as u64)
    };
    let mut monitor = Monitor::new(camera, engine, frame_interval);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("install Ctrl-C handler")?;
    }

    let updates = monitor.start()?;
    log::info!(
        "handwatchd running. device={} screenshots={} cooldown={}s",
        cfg.camera.device,
        cfg.screenshot_dir,
        cfg.alert_interval_secs
    );

    let mut frames = 0u64;
    let mut last_health_log = Instant::now();
    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        match updates.recv_timeout(Duration::from_millis(500)) {
            Ok(report) => {
                frames += 1;
                for effect in &report.effects {
                    match effect {
                        SideEffect::Beep => log::info!("alert beep"),
                        SideEffect::Screenshot(path) => {
                            log::info!("evidence written to {}", path.display())
                        }
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // Worker ended on its own (capture failure).
                break;
            }
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            log::info!("health: {} frames delivered", frames);
            last_health_log = Instant::now();
        }
    }

    monitor.stop()?;
    if let Some(state) = monitor.state() {
        log::info!(
            "session ended: {} screenshots written",
            state.screenshot_counter
        );
    }
    Ok(())
}

#[cfg(feature = "backend-tract")]
fn build_backends(
    cfg: &MonitorConfig,
) -> Result<(Box<dyn HandLocator>, Box<dyn PersonDetector>)> {
    use handwatch::{LandmarkHandBackend, SsdPersonBackend};

    let person_model = cfg.person_model.as_ref().ok_or_else(|| {
        anyhow!("person model path required (models.person or HANDWATCH_PERSON_MODEL)")
    })?;
    let hand_model = cfg.hand_model.as_ref().ok_or_else(|| {
        anyhow!("hand model path required (models.hand or HANDWATCH_HAND_MODEL)")
    })?;

    let hands = LandmarkHandBackend::new(hand_model)?;
    let persons = SsdPersonBackend::new(person_model)?;
    log::info!(
        "loaded detector backends: hands={} persons={}",
        hand_model.display(),
        person_model.display()
    );
    Ok((Box::new(hands), Box::new(persons)))
}

#[cfg(not(feature = "backend-tract"))]
fn build_backends(
    cfg: &MonitorConfig,
) -> Result<(Box<dyn HandLocator>, Box<dyn PersonDetector>)> {
    use handwatch::{ScriptedHands, ScriptedPersons};

    if cfg.person_model.is_some() || cfg.hand_model.is_some() {
        return Err(anyhow!(
            "model paths configured but handwatchd was built without the backend-tract feature"
        ));
    }
    log::warn!("no detector backends compiled in; running with stub detectors");
    Ok((
        Box::new(ScriptedHands::empty()),
        Box::new(ScriptedPersons::empty()),
    ))
}

#[cfg(feature = "alert-audio")]
fn build_sink() -> Box<dyn handwatch::AlertSink> {
    Box::new(handwatch::TonePlayer::default())
}

#[cfg(not(feature = "alert-audio"))]
fn build_sink() -> Box<dyn handwatch::AlertSink> {
    Box::new(handwatch::TerminalBell)
}
