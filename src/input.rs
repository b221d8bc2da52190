use crate::player::Movement;
use crate::simulation::{Frame, Simulation};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Discrete input the front end feeds into the simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Set movement direction and signed speed
    SetMovement { movement: Movement, speed: f32 },
    SetSpeed { speed: f32 },
    Stop,
    /// Turn by `delta` radians
    Rotate { delta: f32 },
    ResetPose,
    ClearFacingCell,
}

impl InputEvent {
    pub fn apply(&self, sim: &mut Simulation) {
        match *self {
            InputEvent::SetMovement { movement, speed } => sim.apply_movement(movement, speed),
            InputEvent::SetSpeed { speed } => sim.set_speed(speed),
            InputEvent::Stop => sim.stop(),
            InputEvent::Rotate { delta } => sim.rotate(delta),
            InputEvent::ResetPose => sim.reset_pose(),
            InputEvent::ClearFacingCell => sim.request_clear_facing_cell(),
        }
    }
}

/// Event tagged with the frame it was applied before
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub frame: u64,
    pub event: InputEvent,
}

/// Recording of a play session that can be replayed deterministically
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    /// Number of frames the session ran
    #[serde(default)]
    pub frame_count: u64,
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event applied before frame `frame`
    pub fn log(&mut self, frame: u64, event: InputEvent) {
        self.frame_count = self.frame_count.max(frame + 1);
        self.events.push(LoggedEvent { frame, event });
    }

    /// Record the total number of frames at the end of the session
    pub fn finish(&mut self, frame_count: u64) {
        self.frame_count = self.frame_count.max(frame_count);
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize event log")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write event log {}", path.display()))?;
        Ok(())
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read event log {}", path.display()))?;
        let mut log: EventLog = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse event log {}", path.display()))?;
        log.events.sort_by_key(|e| e.frame);
        // a hand-written log may undercount; every event still gets its frame
        if let Some(last) = log.events.last() {
            log.frame_count = log.frame_count.max(last.frame + 1);
        }
        Ok(log)
    }

    /// Apply the events frame by frame and run every recorded frame.
    /// `on_frame` sees the simulation after each frame.
    pub fn replay<F>(&self, sim: &mut Simulation, column_count: usize, screen_height: f32, mut on_frame: F)
    where
        F: FnMut(&Simulation, &Frame),
    {
        let mut pending = self.events.iter().peekable();
        for frame in 0..self.frame_count {
            while let Some(logged) = pending.next_if(|e| e.frame <= frame) {
                logged.event.apply(sim);
            }
            let result = sim.frame(column_count, screen_height);
            on_frame(sim, &result);
        }
    }

    /// Print log to console
    pub fn print(&self) {
        println!("\n=== Event Log ({} events, {} frames) ===", self.events.len(), self.frame_count);
        for (i, logged) in self.events.iter().enumerate() {
            println!("[frame {:6}] #{:3} {:?}", logged.frame, i + 1, logged.event);
        }
        println!("=== End of Log ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut movement = 0;
        let mut stops = 0;
        let mut turned = 0.0f32;
        let mut resets = 0;
        let mut clears = 0;

        for logged in &self.events {
            match &logged.event {
                InputEvent::SetMovement { .. } | InputEvent::SetSpeed { .. } => movement += 1,
                InputEvent::Stop => stops += 1,
                InputEvent::Rotate { delta } => turned += delta.abs(),
                InputEvent::ResetPose => resets += 1,
                InputEvent::ClearFacingCell => clears += 1,
            }
        }

        format!(
            "Frames: {}\n\
             Total Events: {}\n\
             Movement: {} changes, {} stops\n\
             Rotation: {:.1} degrees turned\n\
             Resets: {}, cells cleared: {}",
            self.frame_count,
            self.events.len(),
            movement,
            stops,
            turned.to_degrees(),
            resets,
            clears
        )
    }
}
