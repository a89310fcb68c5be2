//! Flood-status feed.
//!
//! A [`FloodStatusSource`] is polled at a fixed cadence.  On a change of the
//! reported flood flag the [`FloodMonitor`] blocks (or unblocks) its
//! configured roads through [`Engine::set_blocked`], exactly as a user click
//! would.  Nothing happens while the flag stays the same, so a user may
//! still toggle a flood road by hand between transitions.
//!
//! # Wire format
//!
//! ```json
//! { "flood": true, "blockedWays": [1279915923] }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fw_core::{RouterConfig, WayId};
use fw_spatial::Router;

use crate::{Engine, EngineError, EngineResult};

// ── FloodStatus ───────────────────────────────────────────────────────────────

/// One reading of the flood feed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloodStatus {
    pub flood: bool,
    /// Ways the feed itself reports as flooded; informational.
    #[serde(default, rename = "blockedWays")]
    pub blocked_ways: Vec<WayId>,
}

impl FloodStatus {
    /// Status derived from a water-level reading: flooded when strictly
    /// above `threshold_cm`.
    pub fn from_water_level(level_cm: f64, threshold_cm: f64, ways: &[WayId]) -> Self {
        let flood = level_cm > threshold_cm;
        Self {
            flood,
            blocked_ways: if flood { ways.to_vec() } else { Vec::new() },
        }
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

/// Something the monitor can ask for the current flood status.
pub trait FloodStatusSource: Send {
    fn fetch(&mut self) -> EngineResult<FloodStatus>;
}

/// Reads a status document from a JSON file on every fetch.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl FloodStatusSource for JsonFileSource {
    fn fetch(&mut self) -> EngineResult<FloodStatus> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| EngineError::FloodStatus(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| EngineError::FloodStatus(format!("{}: {e}", self.path.display())))
    }
}

/// Adapts a water-level sensor (cm) into flood statuses.
pub struct WaterLevelSource<F> {
    read:         F,
    threshold_cm: f64,
    ways:         Vec<WayId>,
}

impl<F> WaterLevelSource<F>
where
    F: FnMut() -> EngineResult<f64> + Send,
{
    pub fn new(read: F, threshold_cm: f64, ways: Vec<WayId>) -> Self {
        Self { read, threshold_cm, ways }
    }

    /// Threshold and ways taken from `config`.
    pub fn from_config(read: F, config: &RouterConfig) -> Self {
        Self::new(read, config.flood_threshold_cm, config.flood_ways.clone())
    }
}

impl<F> FloodStatusSource for WaterLevelSource<F>
where
    F: FnMut() -> EngineResult<f64> + Send,
{
    fn fetch(&mut self) -> EngineResult<FloodStatus> {
        let level = (self.read)()?;
        if !level.is_finite() {
            return Err(EngineError::FloodStatus(format!("water level {level} is not finite")));
        }
        Ok(FloodStatus::from_water_level(level, self.threshold_cm, &self.ways))
    }
}

// ── FloodMonitor ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FloodTransition {
    Flooded,
    Cleared,
}

/// Tracks the last observed flood flag and applies transitions.
#[derive(Clone, Debug)]
pub struct FloodMonitor {
    ways:    Vec<WayId>,
    flooded: bool,
}

impl FloodMonitor {
    /// A monitor for `ways`, starting in the "clear" state.
    pub fn new(ways: Vec<WayId>) -> Self {
        Self { ways, flooded: false }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(config.flood_ways.clone())
    }

    pub fn is_flooded(&self) -> bool {
        self.flooded
    }

    pub fn ways(&self) -> &[WayId] {
        &self.ways
    }

    /// Apply `status`.  Returns the transition if the flag changed.
    ///
    /// Ways unknown to the engine (e.g. clipped out of the service area) are
    /// logged and skipped.
    pub fn observe<R: Router>(&mut self, engine: &Engine<R>, status: &FloodStatus) -> Option<FloodTransition> {
        if status.flood == self.flooded {
            return None;
        }
        self.flooded = status.flood;

        for &way in &self.ways {
            match engine.set_blocked(way, self.flooded) {
                Ok(_) => {}
                Err(EngineError::UnknownRoad(w)) => log::warn!("flood feed names {w}, which is not in the graph"),
                Err(e) => log::warn!("flood feed could not update {way}: {e}"),
            }
        }

        let transition = if self.flooded { FloodTransition::Flooded } else { FloodTransition::Cleared };
        log::info!("flood status changed: {transition:?}");
        Some(transition)
    }

    /// Fetch from `source` and apply.  A failed fetch is logged and leaves
    /// the state untouched.
    pub fn poll<R: Router>(
        &mut self,
        engine: &Engine<R>,
        source: &mut dyn FloodStatusSource,
    ) -> Option<FloodTransition> {
        match source.fetch() {
            Ok(status) => self.observe(engine, &status),
            Err(e) => {
                log::warn!("flood status poll failed: {e}");
                None
            }
        }
    }

    /// Poll `source` every `interval` on a background thread.
    ///
    /// The first poll happens immediately.  Stop with
    /// [`FloodMonitorHandle::stop`], which hands the monitor back.
    pub fn spawn<R, S>(mut self, engine: Arc<Engine<R>>, mut source: S, interval: Duration) -> FloodMonitorHandle
    where
        R: Router + 'static,
        S: FloodStatusSource + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread = std::thread::spawn(move || {
            loop {
                self.poll(&*engine, &mut source);
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Stop requested or handle dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            self
        });
        FloodMonitorHandle { stop_tx, thread }
    }
}

/// Running background monitor.  Dropping it also stops the thread.
pub struct FloodMonitorHandle {
    stop_tx: Sender<()>,
    thread:  JoinHandle<FloodMonitor>,
}

impl FloodMonitorHandle {
    /// Signal the thread, wait for it, and return the monitor's final state.
    pub fn stop(self) -> EngineResult<FloodMonitor> {
        let _ = self.stop_tx.send(());
        self.thread
            .join()
            .map_err(|_| EngineError::FloodStatus("flood monitor thread panicked".into()))
    }
}
