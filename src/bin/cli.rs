// src/bin/cli.rs
use color_eyre::eyre::{Result, eyre};
use toh_embed::{cli, runner};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cmd = cli::parse_args(std::env::args().skip(1)).map_err(|e| eyre!("{e}"))?;
    runner::run(cmd).map_err(|e| eyre!("{e}"))
}
