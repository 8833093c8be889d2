use std::process::ExitCode;

use clap::Parser;
use config::args::ArgsConfig;

use crate::build_info::build_info;

// Defined in the binary crate so that clap reads name, version and
// description from this crate's Cargo.toml.

#[derive(Parser)]
#[command(author, version, about)]
pub struct AppArgs {
    #[command(flatten)]
    pub args: ArgsConfig,
}

pub fn get_config() -> Result<ArgsConfig, ExitCode> {
    let AppArgs { args } = AppArgs::parse();

    if args.build_info {
        println!("{}", build_info());
        return Err(ExitCode::SUCCESS);
    }

    Ok(args)
}
