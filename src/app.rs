// src/app.rs - Frame loop wiring hand source -> gesture controller -> exporter
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::data::{DataExporter, RecordedSession, SessionSummary};
use crate::gesture::{GestureConfig, GestureController, GestureEvent};
use crate::outfits;
use crate::tracking::{FrameInput, HandSource, Viewport};

const METRICS_WINDOW: usize = 30;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub ticks_per_second: u32,
    pub viewport: Viewport,
    pub output_directory: PathBuf,
    /// Pace ticks at `ticks_per_second` instead of running flat out.
    pub realtime: bool,
    pub max_ticks: Option<u64>,
    /// Also save the hands fed to the controller as a replayable session.
    pub record_session: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: 30,
            viewport: Viewport::HD,
            output_directory: directories::UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(|p| p.join("ToonMirror")))
                .unwrap_or_else(|| PathBuf::from("./output")),
            realtime: false,
            max_ticks: None,
            record_session: false,
        }
    }
}

pub fn load_gesture_config(path: impl AsRef<Path>) -> Result<GestureConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read gesture config {}", path.display()))?;
    let config: GestureConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid gesture config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Rejected gesture config {}", path.display()))?;
    Ok(config)
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    pub avg_fps: f32,
    /// Seconds spent inside the gesture update, averaged over the window.
    pub avg_processing_time: f32,
    #[serde(skip)]
    frame_times: VecDeque<f32>,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            avg_fps: 0.0,
            avg_processing_time: 0.0,
            frame_times: VecDeque::with_capacity(METRICS_WINDOW),
        }
    }

    pub fn record(&mut self, elapsed: f32) {
        self.frame_times.push_front(elapsed);
        if self.frame_times.len() > METRICS_WINDOW {
            self.frame_times.pop_back();
        }

        self.avg_processing_time =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.avg_fps = if self.avg_processing_time > 0.0 {
            1.0 / self.avg_processing_time
        } else {
            0.0
        };
    }

    pub fn samples(&self) -> usize {
        self.frame_times.len()
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MirrorApp {
    source: Box<dyn HandSource>,
    controller: GestureController,
    exporter: DataExporter,
    recording: Option<RecordedSession>,
    settings: AppSettings,
    metrics: PerformanceMetrics,
}

impl MirrorApp {
    pub fn new(
        source: Box<dyn HandSource>,
        config: GestureConfig,
        settings: AppSettings,
        session_name: Option<String>,
    ) -> Result<Self> {
        let controller = GestureController::new(config, outfits::count())
            .context("Failed to create gesture controller")?;
        debug!(
            "gesture config {:?}, {} outfits",
            controller.config(),
            controller.outfit_count()
        );
        let exporter = DataExporter::new(&settings.output_directory, session_name);
        let recording = settings
            .record_session
            .then(|| RecordedSession::new(settings.viewport));

        Ok(Self {
            source,
            controller,
            exporter,
            recording,
            settings,
            metrics: PerformanceMetrics::new(),
        })
    }

    pub fn controller(&self) -> &GestureController {
        &self.controller
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    fn reached_limit(&self) -> bool {
        self.settings
            .max_ticks
            .map_or(false, |max| self.controller.ticks() >= max)
    }

    /// Pull one frame from the source and run it through the controller.
    /// Returns `None` once the source is exhausted.
    pub fn tick(&mut self) -> Option<Vec<GestureEvent>> {
        let hands = self.source.next_hands()?;
        let frame = FrameInput::new(hands, self.settings.viewport);

        let start = Instant::now();
        let events = self.controller.update(&frame);
        self.metrics.record(start.elapsed().as_secs_f32());

        let tick = self.controller.ticks();
        let timestamp = (tick - 1) as f64 / self.settings.ticks_per_second.max(1) as f64;
        self.exporter.add_tick(
            tick,
            timestamp,
            frame.hands.len(),
            self.controller.state(),
            &events,
        );
        if let Some(recording) = self.recording.as_mut() {
            recording.push(&frame.hands);
        }

        for event in &events {
            let GestureEvent::OutfitChanged { index, .. } = event;
            if let Some(outfit) = outfits::outfit(*index) {
                info!("now wearing {}", outfit.name);
            }
        }
        Some(events)
    }

    /// Run until the source runs dry, the tick limit is hit, or Ctrl-C.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        let tps = self.settings.ticks_per_second.max(1);
        let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / tps as f64));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "mirror running: source={} viewport={}x{} tps={} realtime={}",
            self.source.name(),
            self.settings.viewport.width(),
            self.settings.viewport.height(),
            tps,
            self.settings.realtime
        );

        while !self.reached_limit() {
            if self.settings.realtime {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = tokio::signal::ctrl_c() => {
                        warn!("interrupted, finishing session");
                        break;
                    }
                }
            }
            if self.tick().is_none() {
                debug!("source {} exhausted", self.source.name());
                break;
            }
        }

        self.finish()
    }

    /// Write the CSV, summary, report and optional landmark recording.
    pub fn finish(&self) -> Result<SessionSummary> {
        let summary = self.exporter.summary(self.source.name(), &self.metrics);

        let csv = self.exporter.export_csv().context("Failed to export interaction CSV")?;
        let json = self
            .exporter
            .export_summary(&summary)
            .context("Failed to write session summary")?;
        let report = self
            .exporter
            .generate_report(&summary)
            .context("Failed to write session report")?;
        debug!("exports: {} {} {}", csv.display(), json.display(), report.display());

        if let Some(recording) = &self.recording {
            let path = self.exporter.session_dir().join("hands.json");
            recording
                .save(&path)
                .context("Failed to save landmark recording")?;
            info!("landmarks recorded to {}", path.display());
        }

        info!(
            "session {} done: {} ticks, {} next / {} previous, wearing {}",
            summary.session_name,
            summary.total_ticks,
            summary.next_switches,
            summary.previous_switches,
            summary.final_outfit
        );
        Ok(summary)
    }
}
