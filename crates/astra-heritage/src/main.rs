#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

use tls_client as _;

pub mod args;
pub mod build_info;

use std::process::ExitCode;

use build_info::BUILD_INFO_CARGO_PKG_VERSION;
use config::get_config;
use server::AstraHeritageServer;

fn main() -> ExitCode {
    let args = match args::get_config() {
        Ok(args) => args,
        Err(e) => return e,
    };

    let config = match get_config(args, BUILD_INFO_CARGO_PKG_VERSION.to_string()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:?}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Tokio runtime creation failed. Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async {
        match AstraHeritageServer::new(config).run().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{:?}", e);
                ExitCode::FAILURE
            }
        }
    })
}
