// src/data.rs - Landmark session files and per-tick interaction export
use chrono::Local;
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::PerformanceMetrics;
use crate::error::{MirrorError, Result};
use crate::gesture::{Direction, GestureEvent, InteractionState};
use crate::outfits;
use crate::tracking::{HandSnapshot, Viewport};

// ── Landmark sessions ──────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// One entry per detected hand, each 21 `[x, y, z]` points.
    pub hands: Vec<Vec<[f64; 3]>>,
}

/// Hand landmarks captured frame by frame, replayable through `ReplaySource`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSession {
    pub viewport: Viewport,
    pub frames: Vec<RecordedFrame>,
}

impl RecordedSession {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, hands: &[HandSnapshot]) {
        self.frames.push(RecordedFrame {
            hands: hands.iter().map(HandSnapshot::to_coords).collect(),
        });
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let session: Self = serde_json::from_reader(reader)?;
        debug!("loaded {} frames from {}", session.frames.len(), path.display());
        Ok(session)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Validate every hand. Fails on the first malformed one.
    pub fn into_frames(self) -> Result<Vec<Vec<HandSnapshot>>> {
        if self.frames.is_empty() {
            return Err(MirrorError::EmptySession);
        }
        self.frames
            .iter()
            .map(|frame| {
                frame
                    .hands
                    .iter()
                    .map(|coords| HandSnapshot::from_coords(coords))
                    .collect()
            })
            .collect()
    }
}

// ── Interaction export ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub tick: u64,
    pub timestamp: f64,
    pub hand_count: usize,
    pub scale_target: f64,
    pub scale_current: f64,
    pub hover_prev: u32,
    pub hover_next: u32,
    pub cooldown_ticks: u32,
    pub selected_index: usize,
    pub outfit_id: String,
    pub event: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_name: String,
    pub started_at: String,
    pub source: String,
    pub total_ticks: usize,
    pub ticks_with_hands: usize,
    pub hover_ticks: usize,
    pub next_switches: usize,
    pub previous_switches: usize,
    pub final_outfit: String,
    pub final_scale: f64,
    pub avg_tick_ms: f32,
    pub avg_fps: f32,
}

pub struct DataExporter {
    output_dir: PathBuf,
    session_name: String,
    started_at: String,
    records: Vec<InteractionRecord>,
}

impl DataExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let now = Local::now();
        let session_name = session_name.unwrap_or_else(|| {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            format!("session_{}_{}", now.format("%Y%m%d_%H%M%S"), &suffix[..8])
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            started_at: now.to_rfc3339(),
            records: Vec::new(),
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn add_tick(
        &mut self,
        tick: u64,
        timestamp: f64,
        hand_count: usize,
        state: &InteractionState,
        events: &[GestureEvent],
    ) {
        let outfit_id = outfits::outfit(state.selected_index)
            .map(|o| o.id.to_string())
            .unwrap_or_default();
        let event = events
            .iter()
            .map(|e| match e {
                GestureEvent::OutfitChanged { direction, index } => {
                    format!("{}:{}", direction.as_str(), index)
                }
            })
            .reduce(|a, b| format!("{};{}", a, b));

        self.records.push(InteractionRecord {
            tick,
            timestamp,
            hand_count,
            scale_target: state.scale_target.w,
            scale_current: state.scale_current.w,
            hover_prev: state.hover_for(Direction::Previous),
            hover_next: state.hover_for(Direction::Next),
            cooldown_ticks: state.cooldown_ticks,
            selected_index: state.selected_index,
            outfit_id,
            event,
        });
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.session_dir().join("interaction.csv");
        std::fs::create_dir_all(self.session_dir())?;

        let mut writer = Writer::from_writer(File::create(&csv_path)?);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("wrote {} ticks to {}", self.records.len(), csv_path.display());
        Ok(csv_path)
    }

    pub fn summary(&self, source: &str, metrics: &PerformanceMetrics) -> SessionSummary {
        let count_events = |dir: &str| {
            self.records
                .iter()
                .filter_map(|r| r.event.as_deref())
                .flat_map(|e| e.split(';'))
                .filter(|e| e.starts_with(dir))
                .count()
        };
        let last = self.records.last();

        SessionSummary {
            session_name: self.session_name.clone(),
            started_at: self.started_at.clone(),
            source: source.to_string(),
            total_ticks: self.records.len(),
            ticks_with_hands: self.records.iter().filter(|r| r.hand_count > 0).count(),
            hover_ticks: self
                .records
                .iter()
                .filter(|r| r.hover_prev > 0 || r.hover_next > 0)
                .count(),
            next_switches: count_events(Direction::Next.as_str()),
            previous_switches: count_events(Direction::Previous.as_str()),
            final_outfit: last.map(|r| r.outfit_id.clone()).unwrap_or_default(),
            final_scale: last.map(|r| r.scale_current).unwrap_or(1.0),
            avg_tick_ms: metrics.avg_processing_time * 1000.0,
            avg_fps: metrics.avg_fps,
        }
    }

    pub fn export_summary(&self, summary: &SessionSummary) -> Result<PathBuf> {
        let path = self.session_dir().join("summary.json");
        std::fs::create_dir_all(self.session_dir())?;
        std::fs::write(&path, serde_json::to_string_pretty(summary)?)?;
        Ok(path)
    }

    pub fn generate_report(&self, summary: &SessionSummary) -> Result<PathBuf> {
        let report_path = self.session_dir().join("report.html");
        std::fs::create_dir_all(self.session_dir())?;
        std::fs::write(&report_path, Self::create_html_report(summary))?;
        Ok(report_path)
    }

    fn create_html_report(summary: &SessionSummary) -> String {
        let presence = if summary.total_ticks == 0 {
            0.0
        } else {
            summary.ticks_with_hands as f64 / summary.total_ticks as f64 * 100.0
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Mirror Session Report - {name}</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 40px; background: #141414; color: #eee; }}
        .stats {{ background: #222; padding: 20px; border-radius: 8px; }}
        .stat-item {{ margin: 10px 0; }}
        .stat-label {{ font-weight: bold; color: #aaa; }}
        .stat-value {{ color: #00ffff; font-size: 1.2em; }}
    </style>
</head>
<body>
    <h1>Mirror Session Report</h1>
    <div class="stats">
        <h2>Session: {name} ({source})</h2>
        <div class="stat-item"><span class="stat-label">Total Ticks:</span> <span class="stat-value">{ticks}</span></div>
        <div class="stat-item"><span class="stat-label">Hands Present:</span> <span class="stat-value">{presence:.1}%</span></div>
        <div class="stat-item"><span class="stat-label">Hover Ticks:</span> <span class="stat-value">{hover}</span></div>
        <div class="stat-item"><span class="stat-label">Next / Previous:</span> <span class="stat-value">{next} / {prev}</span></div>
        <div class="stat-item"><span class="stat-label">Final Outfit:</span> <span class="stat-value">{outfit}</span></div>
        <div class="stat-item"><span class="stat-label">Final Scale:</span> <span class="stat-value">{scale:.2}</span></div>
        <div class="stat-item"><span class="stat-label">Avg Tick:</span> <span class="stat-value">{tick_ms:.3} ms</span></div>
    </div>
</body>
</html>
"#,
            name = summary.session_name,
            source = summary.source,
            ticks = summary.total_ticks,
            presence = presence,
            hover = summary.hover_ticks,
            next = summary.next_switches,
            prev = summary.previous_switches,
            outfit = summary.final_outfit,
            scale = summary.final_scale,
            tick_ms = summary.avg_tick_ms,
        )
    }
}
