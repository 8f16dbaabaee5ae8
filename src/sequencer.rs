//! Benchmark sequencer
//!
//! A fixed cycle: menu, then each demo for a set duration, then a results
//! screen. Start on the menu or results screen begins a fresh run with
//! cleared averages.

use crate::config::BenchConfig;
use crate::display::{draw_text_bg, draw_text_centered, PixelBuffer, GLYPH_HEIGHT};
use crate::effects::color::WHITE;
use crate::effects::{Effect, Helix, Laser, Noise, RadialLines};
use crate::host::{EdgeDetector, HostPort, TelemetrySample};
use crate::stats::Statistics;
use log::info;

const MENU_PROMPT: &str = "PRESS START TO BEGIN SOFTWARE PERFORMANCE TEST";
const RESULTS_PROMPT: &str = "PRESS START TO RESTART SOFTWARE PERFORMANCE TEST";
const PANEL_X: i32 = 32;
const PANEL_Y: i32 = 32;
const RESULTS_Y: i32 = 88;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoState {
    Menu,
    Helix,
    Laser,
    RadialLines,
    Noise,
    Results,
}

impl DemoState {
    /// Demos in run order
    pub const CYCLE: [DemoState; 4] = [
        DemoState::Helix,
        DemoState::Laser,
        DemoState::RadialLines,
        DemoState::Noise,
    ];

    /// Successor in the cycle; Menu and Results both lead into the first demo
    pub fn next(self) -> Self {
        match self {
            DemoState::Menu | DemoState::Results => DemoState::Helix,
            DemoState::Helix => DemoState::Laser,
            DemoState::Laser => DemoState::RadialLines,
            DemoState::RadialLines => DemoState::Noise,
            DemoState::Noise => DemoState::Results,
        }
    }

    pub fn is_running(self) -> bool {
        !matches!(self, DemoState::Menu | DemoState::Results)
    }
}

/// The four timed generators, kept alive across the whole run
struct DemoSet {
    helix: Helix,
    laser: Laser,
    radial_lines: RadialLines,
    noise: Noise,
}

impl DemoSet {
    fn new() -> Self {
        Self {
            helix: Helix::new(),
            laser: Laser::new(),
            radial_lines: RadialLines::new(),
            noise: Noise::new(),
        }
    }

    fn get(&mut self, state: DemoState) -> Option<&mut dyn Effect> {
        match state {
            DemoState::Helix => Some(&mut self.helix),
            DemoState::Laser => Some(&mut self.laser),
            DemoState::RadialLines => Some(&mut self.radial_lines),
            DemoState::Noise => Some(&mut self.noise),
            DemoState::Menu | DemoState::Results => None,
        }
    }
}

pub struct Sequencer {
    state: DemoState,
    demos: DemoSet,
    stats: Statistics,
    start_button: EdgeDetector,
    demo_duration: f32,
    /// Clock value at which the current state's timer was anchored
    demo_start: Option<f64>,
    elapsed: f32,
}

impl Sequencer {
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            state: DemoState::Menu,
            demos: DemoSet::new(),
            stats: Statistics::new(config.warm_up_windows, config.sample_interval),
            start_button: EdgeDetector::default(),
            demo_duration: config.demo_duration,
            demo_start: None,
            elapsed: 0.0,
        }
    }

    pub fn state(&self) -> DemoState {
        self.state
    }

    /// Seconds since the current state was entered
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    fn enter(&mut self, state: DemoState) {
        info!("{:?} -> {:?}", self.state, state);
        self.state = state;
        self.demo_start = None;
        self.elapsed = 0.0;
        self.stats.begin_demo();
    }

    /// One frame of the state machine.
    ///
    /// `telemetry` is only invoked when a sampling window closes.
    pub fn advance(
        &mut self,
        canvas: &mut PixelBuffer,
        now: f64,
        start_pressed: bool,
        mut telemetry: impl FnMut() -> TelemetrySample,
    ) {
        if start_pressed && !self.state.is_running() {
            info!("starting benchmark run");
            self.stats.reset();
            self.enter(DemoState::Helix);
        }

        let start = *self.demo_start.get_or_insert(now);
        self.elapsed = (now - start).max(0.0) as f32;

        canvas.clear();
        match self.state {
            DemoState::Menu => self.draw_menu(canvas),
            DemoState::Results => self.draw_results(canvas),
            state => {
                if let Some(demo) = self.demos.get(state) {
                    demo.render(self.elapsed, canvas);
                }
                self.draw_panel(canvas);
            },
        }

        if self.state.is_running() {
            self.stats.count_frame();
            if self.stats.sample_due(now) {
                let sample = telemetry();
                self.stats.record_window(now, sample);
                info!("{}", self.stats.text().log_line());
            }
        }

        if self.state.is_running() && self.elapsed >= self.demo_duration {
            self.enter(self.state.next());
            if self.state == DemoState::Results {
                info!("results: {}", self.stats.text().summary().join(" | "));
            }
        }
    }

    /// Poll the host, advance one frame and hand it back.
    /// Returns `Ok(false)` once the host asks to quit.
    pub fn tick<H: HostPort>(&mut self, host: &mut H, canvas: &mut PixelBuffer) -> anyhow::Result<bool> {
        let input = host.poll_input();
        if input.quit {
            return Ok(false);
        }
        let start = self.start_button.rising(input.start);
        let now = host.now();
        self.advance(canvas, now, start, || host.sample_telemetry());
        host.submit_frame(canvas)?;
        Ok(true)
    }

    fn draw_menu(&self, canvas: &mut PixelBuffer) {
        let y = canvas.height() as i32 / 2 - GLYPH_HEIGHT as i32 / 2;
        draw_text_centered(canvas, y, MENU_PROMPT, WHITE);
    }

    fn draw_panel(&self, canvas: &mut PixelBuffer) {
        for (row, line) in self.stats.text().panel().iter().enumerate() {
            let y = PANEL_Y + row as i32 * GLYPH_HEIGHT as i32;
            draw_text_bg(canvas, PANEL_X, y, line, WHITE);
        }
    }

    fn draw_results(&self, canvas: &mut PixelBuffer) {
        let x = canvas.width() as i32 / 3;
        for (row, line) in self.stats.text().summary().iter().enumerate() {
            let y = RESULTS_Y + row as i32 * GLYPH_HEIGHT as i32;
            draw_text_bg(canvas, x, y, line, WHITE);
        }
        let y = canvas.height() as i32 / 2 - GLYPH_HEIGHT as i32 / 2;
        draw_text_centered(canvas, y, RESULTS_PROMPT, WHITE);
    }
}
