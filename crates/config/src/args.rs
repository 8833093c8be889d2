//! Config given as command line arguments

use std::{net::SocketAddr, path::PathBuf};

use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct ArgsConfig {
    /// Print build info and quit.
    #[arg(short, long)]
    pub build_info: bool,

    /// Directory for config and secrets files. Relative paths in the
    /// config file are relative to this directory. Default is the
    /// working directory.
    #[arg(short, long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Set public API socket address. Overrides config file value.
    #[arg(short, long, value_name = "ADDR")]
    pub public_api: Option<SocketAddr>,
}
