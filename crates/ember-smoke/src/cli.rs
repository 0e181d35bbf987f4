use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ember_engine::device::GpuInit;
use ember_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

#[derive(Debug, Parser)]
#[command(name = "ember-smoke", version, about = "Windowed smoke tests for the ember gl wrappers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Number of points to allocate and draw.
    #[arg(long, global = true, default_value_t = 2000, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Fixed frame rate; redraws continuously when omitted.
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub fps: Option<u32>,

    /// Seed for the particle emitter.
    #[arg(long, global = true, default_value_t = 1)]
    pub seed: u64,

    /// Directory holding `particle_vs.wgsl` and `particle_fs.wgsl`.
    #[arg(long, global = true)]
    pub shader_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = 640)]
    pub width: u32,

    #[arg(long, global = true, default_value_t = 480)]
    pub height: u32,

    /// Present without waiting for vertical blank.
    #[arg(long, global = true)]
    pub no_vsync: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Subcommand)]
pub enum Command {
    /// Open a window and clear it every frame.
    Window,
    /// Fill a vertex buffer once and draw it every frame.
    Buffer,
    /// Simulate bouncing point particles.
    Particles,
}

impl Cli {
    pub fn subcommand(&self) -> Command {
        self.command.unwrap_or(Command::Particles)
    }

    pub fn shader_dir(&self) -> PathBuf {
        self.shader_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders"))
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let title = match self.subcommand() {
            Command::Window => "ember smoke: window",
            Command::Buffer => "ember smoke: buffer",
            Command::Particles => "ember smoke: particles",
        };
        RuntimeConfig {
            title: title.to_string(),
            initial_size: LogicalSize::new(self.width as f64, self.height as f64),
            target_fps: self.fps,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit::default().with_vsync(!self.no_vsync)
    }
}
