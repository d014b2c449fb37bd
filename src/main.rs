use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use crate::io::loader::FsLoader;
use crate::settings::CliArgs;

mod commands;
mod io;
mod settings;

fn main() -> ExitCode {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    let failed = commands::run(&args, &FsLoader {}, &mut stdout().lock());
    if failed > 0 {
        error!("{} file(s) failed", failed);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
