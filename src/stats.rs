//! Benchmark statistics: per-second FPS/CPU sampling with warm-up gating
//!
//! Frames are counted per sampling window (one second by default). When a
//! window closes the frame count becomes the instantaneous FPS; once the
//! current demo has closed more than `warm_up_windows` windows, the count and
//! the CPU readings are also folded into run-wide averages. Averages survive
//! demo changes and are only cleared by a full restart.

use crate::host::TelemetrySample;

/// Sum and count of accepted samples
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningAverage {
    total: f64,
    count: u64,
}

impl RunningAverage {
    pub fn push(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    /// Mean of accepted samples, `None` before the first one
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// On-screen strings, refreshed once per sampling window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub fps: String,
    pub fps_avg: String,
    pub cpu_multi: String,
    pub cpu_multi_avg: String,
    pub cpu_single: String,
    pub cpu_single_avg: String,
    pub temperature: String,
}

const PLACEHOLDER: &str = "---";

fn cores_label(cores: Option<usize>) -> String {
    cores.map_or_else(|| "?".to_string(), |n| n.to_string())
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| format!("{}%", PLACEHOLDER), |v| format!("{}%", v as i64))
}

impl StatusText {
    fn build(stats: &Statistics) -> Self {
        let cores = cores_label(stats.cores);
        Self {
            fps: format!("FRAMES PER SECOND (FPS): {}", stats.current_fps),
            fps_avg: format!("AVERAGE FPS: {}", stats.fps.mean().unwrap_or(0.0) as u64),
            cpu_multi: format!(
                "CPU MULTI-CORE ({}): {}",
                cores,
                percent(stats.last_cpu_multi.map(f64::from))
            ),
            cpu_multi_avg: format!(
                "AVERAGE CPU MULTI-CORE ({}): {}",
                cores,
                percent(stats.cpu_multi.mean())
            ),
            cpu_single: format!(
                "CPU SINGLE-CORE: {}",
                percent(stats.last_cpu_single.map(f64::from))
            ),
            cpu_single_avg: format!("AVERAGE CPU SINGLE-CORE: {}", percent(stats.cpu_single.mean())),
            temperature: match stats.temperature {
                Some(t) => format!("CPU TEMPERATURE: {}C", t as i64),
                None => format!("CPU TEMPERATURE: {}C", PLACEHOLDER),
            },
        }
    }

    /// Lines of the in-demo info panel, top to bottom
    pub fn panel(&self) -> [&str; 7] {
        [
            &self.fps,
            &self.cpu_multi,
            &self.cpu_single,
            &self.fps_avg,
            &self.cpu_multi_avg,
            &self.cpu_single_avg,
            &self.temperature,
        ]
    }

    /// Lines of the results screen
    pub fn summary(&self) -> [&str; 4] {
        [
            &self.fps_avg,
            &self.cpu_multi_avg,
            &self.cpu_single_avg,
            &self.temperature,
        ]
    }

    /// Single-line form for the log
    pub fn log_line(&self) -> String {
        self.panel().join(" | ")
    }
}

/// Running and average benchmark metrics
#[derive(Debug, Clone)]
pub struct Statistics {
    warm_up_windows: u32,
    interval: f64,

    frames: u32,
    current_fps: u32,
    warm_up_counter: u32,
    last_sample_time: Option<f64>,

    fps: RunningAverage,
    cpu_multi: RunningAverage,
    cpu_single: RunningAverage,

    cores: Option<usize>,
    last_cpu_multi: Option<f32>,
    last_cpu_single: Option<f32>,
    temperature: Option<f32>,

    text: StatusText,
}

impl Statistics {
    pub fn new(warm_up_windows: u32, interval: f64) -> Self {
        let mut stats = Self {
            warm_up_windows,
            interval: if interval > 0.0 { interval } else { 1.0 },
            frames: 0,
            current_fps: 0,
            warm_up_counter: 0,
            last_sample_time: None,
            fps: RunningAverage::default(),
            cpu_multi: RunningAverage::default(),
            cpu_single: RunningAverage::default(),
            cores: None,
            last_cpu_multi: None,
            last_cpu_single: None,
            temperature: None,
            text: StatusText {
                fps: String::new(),
                fps_avg: String::new(),
                cpu_multi: String::new(),
                cpu_multi_avg: String::new(),
                cpu_single: String::new(),
                cpu_single_avg: String::new(),
                temperature: String::new(),
            },
        };
        stats.text = StatusText::build(&stats);
        stats
    }

    /// Full restart: drop every counter, average and reading
    pub fn reset(&mut self) {
        *self = Self::new(self.warm_up_windows, self.interval);
    }

    /// Entering a new demo: warm-up starts over, averages carry on
    pub fn begin_demo(&mut self) {
        self.warm_up_counter = 0;
        self.frames = 0;
    }

    pub fn count_frame(&mut self) {
        self.frames += 1;
    }

    /// True once a full sampling interval has passed since the last sample.
    /// The first call only anchors the window.
    pub fn sample_due(&mut self, now: f64) -> bool {
        match self.last_sample_time {
            None => {
                self.last_sample_time = Some(now);
                false
            },
            Some(last) => now - last >= self.interval,
        }
    }

    /// Close the current window with a telemetry sample.
    /// Returns true when the window counted toward the averages.
    pub fn record_window(&mut self, now: f64, sample: TelemetrySample) -> bool {
        self.warm_up_counter += 1;
        self.current_fps = self.frames;

        self.cores = sample.cores.or(self.cores);
        self.last_cpu_multi = sample.cpu_multi;
        self.last_cpu_single = sample.cpu_single;
        self.temperature = sample.temperature;

        let counted = self.warm_up_counter > self.warm_up_windows;
        if counted {
            self.fps.push(f64::from(self.frames));
            if let Some(cpu) = sample.cpu_multi {
                self.cpu_multi.push(f64::from(cpu));
            }
            if let Some(cpu) = sample.cpu_single {
                self.cpu_single.push(f64::from(cpu));
            }
        }

        self.text = StatusText::build(self);
        self.frames = 0;
        self.last_sample_time = Some(now);
        counted
    }

    pub fn text(&self) -> &StatusText {
        &self.text
    }

    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }

    pub fn frames_in_window(&self) -> u32 {
        self.frames
    }

    pub fn warm_up_counter(&self) -> u32 {
        self.warm_up_counter
    }

    pub fn fps_average(&self) -> &RunningAverage {
        &self.fps
    }

    pub fn cpu_multi_average(&self) -> &RunningAverage {
        &self.cpu_multi
    }

    pub fn cpu_single_average(&self) -> &RunningAverage {
        &self.cpu_single
    }
}
