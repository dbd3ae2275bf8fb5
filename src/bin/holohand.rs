//! holohand - run the gesture scanner against a landmark stream
//!
//! Replays a synthetic or recorded landmark stream through the scanner screen:
//! 1. Picks the content source (CMS or built-in) from configuration
//! 2. Opens the scanner, which fetches content once
//! 3. Feeds every frame to the steadiness detector
//! 4. Prints the result overlay (or the trigger as JSON) when a hold completes
//! 5. Optionally closes the overlay with a simulated Escape to re-arm

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use holohand::{content_source, open_source, HolohandConfig, Key, ScannerStatus, Shell, Status};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Landmark source: stub://steady|jitter|absent|fist or a local JSON-lines trace.
    #[arg(long, env = "HOLOHAND_SOURCE")]
    source: Option<String>,
    /// Frames per second for synthetic sources.
    #[arg(long)]
    fps: Option<u32>,
    /// Duration in seconds for synthetic sources.
    #[arg(long, default_value_t = 3)]
    seconds: u64,
    /// Extended fingers on the synthetic hand (0-4).
    #[arg(long, default_value_t = 4)]
    fingers: u8,
    /// Print trigger events as JSON lines instead of the overlay.
    #[arg(long)]
    json: bool,
    /// Close the overlay (Escape) this many milliseconds after it opens.
    #[arg(long, value_name = "MS")]
    escape_after_ms: Option<u64>,
    /// Pace frames in real time instead of replaying as fast as possible.
    #[arg(long)]
    realtime: bool,
    /// Simulate a refused camera permission.
    #[arg(long)]
    deny_camera: bool,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.fingers > 4 {
        return Err(anyhow!("fingers must be between 0 and 4"));
    }
    let is_tty = std::io::stderr().is_terminal();
    let ui = ui::Ui::from_args(Some(args.ui.as_str()), is_tty, args.json);

    let mut cfg = {
        let _stage = ui.stage("Load configuration");
        HolohandConfig::load()?
    };
    if let Some(source) = args.source.as_deref() {
        cfg.source.url = source.to_string();
    }
    if let Some(fps) = args.fps {
        if fps == 0 {
            return Err(anyhow!("fps must be >= 1"));
        }
        cfg.source.target_fps = fps;
    }

    let content = {
        let _stage = ui.stage("Select content source");
        content_source(&cfg.cms)
    };
    let mut shell = Shell::new(cfg.detector, content);

    let mut source = {
        let _stage = ui.stage("Open landmark source");
        let duration = Some(Duration::from_secs(args.seconds));
        let mut source = open_source(cfg.source.to_source_config(duration, args.fingers))?;
        source.connect()?;
        source
    };

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;
    }

    let scanner = {
        let _stage = ui.stage("Open scanner");
        shell
            .initialize_scanner()
            .ok_or_else(|| anyhow!("scanner screen did not open"))?
    };

    if args.deny_camera {
        scanner.camera_denied();
        for line in scanner.render_lines() {
            println!("{}", line);
        }
        return Ok(());
    }
    scanner.camera_started();

    log::info!(
        "scanning {} (threshold={}, dwell={}ms)",
        cfg.source.url,
        cfg.detector.steady_threshold,
        cfg.detector.time_to_trigger.as_millis()
    );

    let frame_pause = Duration::from_secs_f64(1.0 / f64::from(cfg.source.target_fps));
    let escape_after = args.escape_after_ms.map(Duration::from_millis);
    let mut status_line = ui.status_line();
    let mut overlay_opened_at: Option<Duration> = None;
    let mut triggers = 0u64;

    while running.load(Ordering::SeqCst) {
        let Some(frame) = source.next_frame()? else {
            break;
        };

        let result = scanner.on_frame(frame.observation.as_ref(), frame.timestamp);
        let percent = match result.status {
            ScannerStatus::Detector(Status::Holding { percent }) => percent,
            ScannerStatus::Detector(Status::Analyzing) => 100,
            _ => 0,
        };
        status_line.update(&result.status.to_string(), percent);

        if let Some(event) = result.event {
            triggers += 1;
            overlay_opened_at = Some(frame.timestamp);
            if args.json {
                println!("{}", serde_json::to_string(&event)?);
            } else if let Some(overlay) = scanner.overlay() {
                for line in overlay.render_lines() {
                    status_line.println(&line);
                }
            }
        }

        if let (Some(opened_at), Some(after)) = (overlay_opened_at, escape_after) {
            if frame.timestamp.saturating_sub(opened_at) >= after && scanner.handle_key(Key::Escape) {
                log::info!("overlay closed; scanner re-armed");
                overlay_opened_at = None;
            }
        }

        if args.realtime {
            std::thread::sleep(frame_pause);
        }
    }
    status_line.finish();

    let stats = source.stats();
    log::info!(
        "{} source {}: frames={} hands={} rejected={} triggers={}",
        source.name(),
        stats.source,
        stats.frames_delivered,
        stats.hands_seen,
        stats.rejected,
        triggers
    );
    if !source.is_healthy() {
        log::debug!("landmark source exhausted");
    }

    shell.exit();
    Ok(())
}
