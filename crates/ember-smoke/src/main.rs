mod apps;
mod cli;
mod particles;
mod renderer;

use anyhow::Result;
use clap::Parser;
use ember_engine::logging::{init_logging, LoggingConfig};
use ember_engine::window::Runtime;

use apps::{BufferApp, ClearApp, ParticleApp};
use cli::{Cli, Command};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let cli = Cli::parse();
    let config = cli.runtime_config();
    let gpu_init = cli.gpu_init();
    let count = cli.count as usize;

    log::info!("running `{:?}` smoke test", cli.subcommand());

    match cli.subcommand() {
        Command::Window => Runtime::run(config, gpu_init, ClearApp::default()),
        Command::Buffer => Runtime::run(config, gpu_init, BufferApp::new(cli.shader_dir(), count)),
        Command::Particles => Runtime::run(
            config,
            gpu_init,
            ParticleApp::new(cli.shader_dir(), count, cli.seed),
        ),
    }
}
