use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use uniform_probe::{
    probe::{self, ProbeFile},
    window::Window,
};

const WINDOW_TITLE: &str = "uniform-probe";

/// Writes the uniforms listed in a probe file into a freshly linked program
/// and checks that the driver reports the same values back.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON probe file
    #[arg(value_name = "PATH", default_value = "probes/basic.json")]
    probe_file: PathBuf,
    /// Directory relative shader paths are resolved against
    #[arg(long, value_name = "PATH", default_value = ".")]
    shader_root: PathBuf,
    #[arg(long, default_value_t = 64)]
    width: u32,
    #[arg(long, default_value_t = 64)]
    height: u32,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let file = ProbeFile::load(&args.probe_file)?;
    log::info!(
        "probing {} uniforms from {}",
        file.uniforms.len(),
        args.probe_file.display()
    );

    let (window, _event_loop) = Window::hidden(WINDOW_TITLE, args.width, args.height)
        .map_err(|error| anyhow::anyhow!("{error}"))?;
    let report = probe::run(window.gl(), &file, &args.shader_root)?;

    for (name, outcome) in &report.outcomes {
        println!("{name}: {outcome}");
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        log::warn!("some uniforms did not read back as written");
        Ok(ExitCode::FAILURE)
    }
}
