use anyhow::{Context, Result};
use log::*;
use structopt::StructOpt;
use vmd_camera::{convert, Config};

use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "convert",
    about = "compiles a vmd camera track into a tick-gated mcfunction"
)]
struct Opt {
    /// Camera motion file
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Scoreboard objective gating the camera, also names the output folder
    song: String,

    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::from_args();

    let config = match opt.config {
        Some(ref path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to parse config file: {}", e);
                Default::default()
            }
        },
        None => Default::default(),
    };
    debug!("{:?}", config);

    let path = convert(&opt.input, &opt.song, &config)
        .with_context(|| format!("failed to convert {}", opt.input.display()))?;
    info!("camera for `{}` written to {}", opt.song, path.display());

    Ok(())
}
