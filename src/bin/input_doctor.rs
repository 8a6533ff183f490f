//! Input engine diagnostics
//!
//! `input-doctor check` runs every health check against a profile and exits
//! with 0 (healthy), 1 (failures) or 2 (warnings only). `input-doctor watch`
//! opens a window and logs each gesture and shortcut the pipeline produces.
//!
//! Usage:
//!   cargo run --bin input-doctor -- check --profile debug --verbose
//!   RUST_LOG=unified_input=trace cargo run --bin input-doctor -- watch --context editor

use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use unified_input::build_info;
use unified_input::config::EngineConfig;
use unified_input::health;
use unified_input::input::{InputCollector, InputPipeline, MonotonicClock};

#[derive(Parser, Debug)]
#[command(name = "input-doctor")]
#[command(about = "Diagnostics for the unified input engine")]
#[command(version = build_info::PKG_VERSION)]
struct Cli {
    /// Configuration profile to load (defaults to INPUT_PROFILE, then release)
    #[arg(long, short = 'p', global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run health checks and print a report (default)
    Check {
        /// List passing findings too
        #[arg(long, short = 'v')]
        verbose: bool,
    },
    /// Open a window and log recognized gestures and fired shortcuts
    Watch {
        /// Shortcut context to activate
        #[arg(long, short = 'c')]
        context: Option<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,unified_input=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli
        .profile
        .or_else(|| std::env::var("INPUT_PROFILE").ok())
        .unwrap_or_else(|| "release".to_string());

    match cli.command.unwrap_or(Command::Check { verbose: false }) {
        Command::Check { verbose } => Ok(check(&profile, verbose)),
        Command::Watch { context } => {
            watch(&profile, context)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(profile: &str, verbose: bool) -> ExitCode {
    println!("{}\n", build_info::version_string());
    let report = health::run_all_checks(profile);
    health::print_report(&report, verbose);
    ExitCode::from(report.exit_code() as u8)
}

fn watch(profile: &str, context: Option<String>) -> anyhow::Result<()> {
    let config = EngineConfig::load(profile)
        .with_context(|| format!("failed to load profile '{profile}'"))?;
    let mut pipeline = InputPipeline::from_config(&config, MonotonicClock::new())
        .context("failed to build input pipeline")?;
    if let Some(context) = context {
        pipeline.shortcuts_mut().set_context(&context);
    }
    info!(
        profile,
        context = pipeline.shortcuts().context(),
        bindings = pipeline.shortcuts().binding_count(),
        "watching input"
    );

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = Watcher {
        window: None,
        collector: InputCollector::new(),
        pipeline,
    };
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;
    Ok(())
}

/// Window that feeds everything it sees through the pipeline
struct Watcher {
    window: Option<Window>,
    collector: InputCollector,
    pipeline: InputPipeline,
}

impl Watcher {
    fn report(&mut self) {
        for (id, gesture) in self.pipeline.take_gestures() {
            info!(recognizer = %id, family = gesture.family(), ?gesture, "gesture");
        }
        for action in self.pipeline.take_actions() {
            info!(action = %action.action_id, context = %action.context, "shortcut");
        }
    }
}

impl ApplicationHandler for Watcher {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title("input-doctor")
            .with_inner_size(winit::dpi::LogicalSize::new(800.0, 600.0));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                self.collector
                    .set_size(size.width as f32, size.height as f32);
                self.collector.set_scale_factor(window.scale_factor() as f32);
                info!(width = size.width, height = size.height, "window created");
                self.window = Some(window);
            }
            Err(e) => {
                error!(error = %e, "failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let now = self.pipeline.now();
        if let Some(raw) = self.collector.handle_window_event(&event, now) {
            self.pipeline.dispatch(&raw, &self.collector);
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Focused(false) => self.pipeline.reset(),
            _ => {}
        }
        self.report();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.pipeline.tick();
        self.report();

        let flow = match self.pipeline.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_sub(self.pipeline.now());
                ControlFlow::WaitUntil(Instant::now() + wait.max(Duration::from_millis(1)))
            }
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(flow);
    }
}
