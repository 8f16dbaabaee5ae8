//! Boundary between the benchmark core and whatever hosts it
//!
//! The sequencer only talks to the outside world through [`HostPort`]: a
//! monotonic clock, a polled button state, a telemetry source and a sink for
//! finished frames. The SDL binary implements it for real; [`ScriptedHost`]
//! replays a fixed timeline for tests.

use crate::display::PixelBuffer;
use std::collections::VecDeque;

/// Button levels for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub start: bool,
    pub quit: bool,
}

/// One telemetry reading. `None` means the value could not be determined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetrySample {
    pub cores: Option<usize>,
    pub cpu_multi: Option<f32>,
    pub cpu_single: Option<f32>,
    pub temperature: Option<f32>,
}

fn non_negative(value: f32) -> Option<f32> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

impl TelemetrySample {
    /// Build from raw readings where any negative value means "unavailable"
    pub fn from_raw(cores: i32, cpu_multi: f32, cpu_single: f32, temperature: f32) -> Self {
        Self {
            cores: usize::try_from(cores).ok().filter(|&n| n > 0),
            cpu_multi: non_negative(cpu_multi),
            cpu_single: non_negative(cpu_single),
            temperature: non_negative(temperature),
        }
    }
}

pub trait HostPort {
    /// Seconds on a monotonic clock
    fn now(&self) -> f64;

    /// Current button levels; called once per frame
    fn poll_input(&mut self) -> InputState;

    fn sample_telemetry(&mut self) -> TelemetrySample;

    fn submit_frame(&mut self, frame: &PixelBuffer) -> anyhow::Result<()>;
}

/// Turns a held level into a single rising-edge event
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    was_down: bool,
}

impl EdgeDetector {
    pub fn rising(&mut self, down: bool) -> bool {
        let edge = down && !self.was_down;
        self.was_down = down;
        edge
    }
}

/// One frame of a scripted timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    pub time: f64,
    pub input: InputState,
}

/// Replays a fixed list of (time, input) steps, one per frame.
///
/// Once the script runs out the host reports `quit`.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    steps: VecDeque<ScriptStep>,
    now: f64,
    pub telemetry: TelemetrySample,
    pub telemetry_queries: usize,
    pub frames_submitted: usize,
    pub last_frame: Option<PixelBuffer>,
}

impl ScriptedHost {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Frames every `dt` seconds from `start` to `end` inclusive, with the
    /// start button held on the first one
    pub fn uniform(start: f64, end: f64, dt: f64) -> Self {
        let count = ((end - start) / dt).round() as usize;
        Self::new((0..=count).map(|n| ScriptStep {
            time: start + n as f64 * dt,
            input: InputState {
                start: n == 0,
                quit: false,
            },
        }))
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl HostPort for ScriptedHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn poll_input(&mut self) -> InputState {
        match self.steps.pop_front() {
            Some(step) => {
                self.now = step.time;
                step.input
            },
            None => InputState {
                start: false,
                quit: true,
            },
        }
    }

    fn sample_telemetry(&mut self) -> TelemetrySample {
        self.telemetry_queries += 1;
        self.telemetry
    }

    fn submit_frame(&mut self, frame: &PixelBuffer) -> anyhow::Result<()> {
        self.frames_submitted += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
