//! demo - end-to-end synthetic run of the overlap pipeline
//!
//! Drives the engine over scripted detections on synthetic frames: a person
//! box is present throughout, a hand enters it twice. Shows the cooldown
//! gating alerts and the evidence files landing in the output directory.

use anyhow::Result;
use clap::Parser;

use handwatch::{
    AlertSink, Annotator, CameraConfig, CameraSource, HandInstance, Keypoint, OverlapEngine,
    PersonBox, ScreenshotStore, ScriptedHands, ScriptedPersons, SideEffect,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of synthetic frames to process.
    #[arg(long, default_value_t = 40)]
    frames: u64,
    /// Simulated frames per second (drives the synthetic clock).
    #[arg(long, default_value_t = 10)]
    fps: u32,
    /// Output directory for evidence screenshots.
    #[arg(long, default_value = "demo_out")]
    out: String,
    /// Alert cooldown in seconds.
    #[arg(long, default_value_t = 2.0)]
    interval: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut camera = CameraSource::new(CameraConfig {
        device: "stub://demo".to_string(),
        target_fps: args.fps,
        width: 320,
        height: 240,
        mirror: false,
    })?;
    camera.connect()?;

    let bbox = PersonBox {
        x1: 40,
        y1: 40,
        x2: 280,
        y2: 200,
        confidence: 0.92,
        class_id: 15,
    };
    let person_script = vec![vec![bbox]; args.frames as usize];
    let hand_script = (0..args.frames)
        .map(|i| {
            // The hand dips into the box twice: frames 10-15 and 30-33.
            let inside = (10..=15).contains(&i) || (30..=33).contains(&i);
            if inside {
                vec![HandInstance::new(vec![Keypoint::new(160, 120)])]
            } else {
                Vec::new()
            }
        })
        .collect();

    let mut engine = OverlapEngine::new(
        Box::new(ScriptedHands::new(hand_script)),
        Box::new(ScriptedPersons::new(person_script)),
        build_sink(),
        ScreenshotStore::new(&args.out)?,
        Annotator::new(None),
    )
    .with_alert_interval(args.interval);

    let tick = 1.0 / args.fps.max(1) as f64;
    for i in 0..args.frames {
        let frame = camera.next_frame()?;
        let report = engine.process_frame(&frame, i as f64 * tick);
        for effect in &report.effects {
            match effect {
                SideEffect::Beep => log::info!("frame {i}: beep"),
                SideEffect::Screenshot(path) => {
                    log::info!("frame {i}: evidence {}", path.display())
                }
            }
        }
    }

    let state = engine.state();
    log::info!(
        "demo complete: {} frames, {} screenshots in {}",
        args.frames,
        state.screenshot_counter,
        args.out
    );
    Ok(())
}

#[cfg(feature = "alert-audio")]
fn build_sink() -> Box<dyn AlertSink> {
    Box::new(handwatch::TonePlayer::default())
}

#[cfg(not(feature = "alert-audio"))]
fn build_sink() -> Box<dyn AlertSink> {
    Box::new(handwatch::TerminalBell)
}
