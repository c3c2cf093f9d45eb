//! Demo binary: drives the pipeline with a synthetic pose script.

use anyhow::{Context, Result};
use clap::Parser;
use gesture_pipeline::config::Config;
use gesture_pipeline::constants::DEFAULT_FPS;
use gesture_pipeline::events::EventType;
use gesture_pipeline::landmarks::{
    Handedness, HandPose, Landmark, FINGER_PIPS, FINGER_TIPS, INDEX_FINGER_MCP, INDEX_FINGER_TIP,
    MIDDLE_FINGER_MCP, MIDDLE_FINGER_TIP, NUM_HAND_LANDMARKS, THUMB_MCP, THUMB_TIP, WRIST,
};
use gesture_pipeline::pipeline::Pipeline;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hand gesture classification and dispatch pipeline")]
struct Args {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Number of synthetic ticks to run
    #[arg(short, long, default_value_t = 90)]
    ticks: usize,
}

/// Open palm with every finger fanned out from the wrist
fn palm_pose() -> HandPose {
    let mut pose = HandPose::new([Landmark::default(); NUM_HAND_LANDMARKS], Handedness::Right, 1.0);
    pose.landmarks[WRIST] = Landmark::new(0.5, 0.9, 0.0);
    let rays = [(-0.20, -0.10), (-0.08, -0.22), (0.0, -0.25), (0.08, -0.22), (0.16, -0.15)];
    for (finger, (dx, dy)) in rays.iter().enumerate() {
        pose.landmarks[FINGER_PIPS[finger]] = Landmark::new(0.5 + dx * 0.5, 0.9 + dy * 0.5, 0.0);
        pose.landmarks[FINGER_TIPS[finger]] = Landmark::new(0.5 + dx, 0.9 + dy, 0.0);
    }
    pose.landmarks[THUMB_MCP] = Landmark::new(0.42, 0.86, 0.0);
    pose.landmarks[INDEX_FINGER_MCP] = Landmark::new(0.47, 0.78, 0.0);
    pose.landmarks[MIDDLE_FINGER_MCP] = Landmark::new(0.5, 0.77, 0.0);
    pose
}

/// Pinched hand drifting horizontally with `offset`
fn pinch_pose(offset: f64) -> HandPose {
    let mut pose = HandPose::new([Landmark::default(); NUM_HAND_LANDMARKS], Handedness::Right, 1.0);
    let cx = 0.4 + offset;
    pose.landmarks[WRIST] = Landmark::new(cx, 0.8, 0.0);
    pose.landmarks[THUMB_TIP] = Landmark::new(cx - 0.01, 0.5, 0.0);
    pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(cx + 0.01, 0.5, 0.0);
    pose.landmarks[MIDDLE_FINGER_TIP] = Landmark::new(cx + 0.2, 0.5, 0.0);
    pose
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path).with_context(|| format!("Failed to load config from {path}"))?,
        None => Config::default(),
    };

    let mut pipeline = Pipeline::from_config(&config).context("Failed to build pipeline")?;

    pipeline.bus().subscribe(
        EventType::System,
        |event| info!("System event: {}", event.action()),
        None,
    );

    // Script: hold a palm, pinch and drag, then lose the hand
    for tick in 0..args.ticks {
        let timestamp = tick as f64 / DEFAULT_FPS;
        let phase = tick * 3 / args.ticks.max(1);
        let pose = match phase {
            0 => Some(palm_pose()),
            1 => Some(pinch_pose((tick % 30) as f64 * 0.005)),
            _ => None,
        };

        let report = pipeline.tick(pose.as_ref(), timestamp);
        if let Some(gesture) = &report.gesture {
            for command in &report.commands {
                info!("t={timestamp:.2} {gesture} -> {}", command.name());
            }
        }
    }

    let stats = pipeline.stats();
    info!(
        "Done: {} detection ticks, {} events published",
        stats.detector.total_detections, stats.events_published
    );
    for (name, handler_stats) in &stats.handlers {
        info!(
            "Handler {name}: {} executions, {} errors, {} cooldown skips",
            handler_stats.executions, handler_stats.errors, handler_stats.skipped_cooldown
        );
    }

    Ok(())
}
