use anyhow::{anyhow, Context};
use log::info;
use pibench::config::{parse_args, BenchConfig, Command, USAGE};
use pibench::display::{draw_text, Display, InputEvent, PixelBuffer, RenderTarget};
use pibench::effects::color::{rgb, BLACK};
use pibench::effects::{self, Effect};
use pibench::host::{HostPort, InputState, TelemetrySample};
use pibench::sequencer::Sequencer;
use pibench::telemetry::ProcTelemetry;
use pibench::util::FpsCounter;
use pibench::{VIDEO_HEIGHT, VIDEO_WIDTH};
use sdl2::keyboard::Keycode;
use std::time::Instant;

/// SDL window plus procfs telemetry as the benchmark's host
struct SdlHost<'a> {
    display: Display,
    target: RenderTarget<'a>,
    telemetry: ProcTelemetry,
    clock: Instant,
    start_held: bool,
}

impl HostPort for SdlHost<'_> {
    fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    fn poll_input(&mut self) -> InputState {
        let mut quit = false;
        for event in self.display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => quit = true,
                InputEvent::KeyDown(Keycode::Return | Keycode::Space) => self.start_held = true,
                InputEvent::KeyUp(Keycode::Return | Keycode::Space) => self.start_held = false,
                _ => {},
            }
        }
        InputState {
            start: self.start_held,
            quit,
        }
    }

    fn sample_telemetry(&mut self) -> TelemetrySample {
        self.telemetry.sample()
    }

    fn submit_frame(&mut self, frame: &PixelBuffer) -> anyhow::Result<()> {
        self.display
            .present(&mut self.target, frame)
            .map_err(|e| anyhow!(e))
            .context("presenting frame")
    }
}

fn run_bench(config: &BenchConfig) -> anyhow::Result<()> {
    let (display, texture_creator) =
        Display::with_options("pibench", VIDEO_WIDTH, VIDEO_HEIGHT, config.scale, config.vsync)
            .map_err(|e| anyhow!(e))
            .context("initializing SDL")?;
    let target = RenderTarget::with_size(&texture_creator, VIDEO_WIDTH, VIDEO_HEIGHT)
        .map_err(|e| anyhow!(e))
        .context("creating frame texture")?;

    let mut host = SdlHost {
        display,
        target,
        telemetry: ProcTelemetry::new(),
        clock: Instant::now(),
        start_held: false,
    };
    let mut canvas = PixelBuffer::new();
    let mut sequencer = Sequencer::new(config);

    info!(
        "benchmark ready: {}s per demo, {} warm-up windows, vsync {}",
        config.demo_duration,
        config.warm_up_windows,
        if config.vsync { "on" } else { "off" }
    );

    while sequencer.tick(&mut host, &mut canvas)? {}

    info!("quit");
    Ok(())
}

/// Loop one generator with an FPS readout; Left/Right switch generators
fn run_preview(config: &BenchConfig, name: &str) -> anyhow::Result<()> {
    let mut demos = effects::all();
    let first = effects::by_name(name).with_context(|| format!("unknown demo '{}'", name))?;
    let mut current = demos
        .iter()
        .position(|d| d.name() == first.name())
        .unwrap_or(0);

    let (mut display, texture_creator) =
        Display::with_options("pibench preview", VIDEO_WIDTH, VIDEO_HEIGHT, config.scale, config.vsync)
            .map_err(|e| anyhow!(e))
            .context("initializing SDL")?;
    let mut target = RenderTarget::with_size(&texture_creator, VIDEO_WIDTH, VIDEO_HEIGHT)
        .map_err(|e| anyhow!(e))
        .context("creating frame texture")?;

    let mut buffer = PixelBuffer::new();
    let mut fps_counter = FpsCounter::new(60);
    let clock = Instant::now();
    let mut demo_start = 0.0;
    let yellow = rgb(255, 255, 0);

    info!("previewing {}", demos[current].name());

    'main: loop {
        let now = clock.elapsed().as_secs_f64();
        let (_dt, avg_fps) = fps_counter.tick(now);

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::Left) => {
                    current = (current + demos.len() - 1) % demos.len();
                    demo_start = now;
                    info!("previewing {}", demos[current].name());
                },
                InputEvent::KeyDown(Keycode::Right) => {
                    current = (current + 1) % demos.len();
                    demo_start = now;
                    info!("previewing {}", demos[current].name());
                },
                _ => {},
            }
        }

        let demo: &mut Box<dyn Effect> = &mut demos[current];
        buffer.clear();
        demo.render((now - demo_start) as f32, &mut buffer);

        let fps_text = format!(
            "{}  FPS {}  {}ms",
            demo.name().to_ascii_uppercase(),
            avg_fps as u32,
            fps_counter.avg_frame_time_ms() as u32
        );
        // Shadow first so the readout stays legible over any demo
        let y = buffer.height() as i32 - 12;
        draw_text(&mut buffer, 5, y + 1, &fps_text, BLACK);
        draw_text(&mut buffer, 4, y, &fps_text, yellow);

        display
            .present(&mut target, &buffer)
            .map_err(|e| anyhow!(e))
            .context("presenting frame")?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        },
        Command::Bench(config) => run_bench(&config),
        Command::Preview { config, demo } => run_preview(&config, &demo),
    }
}
