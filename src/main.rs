#![allow(clippy::collapsible_if)]
use ::log::debug;
use std::process::ExitCode;

use tini_rs::cli::{self, Cmd};
use tini_rs::log as tini_log;
use tini_rs::supervisor;

fn main() -> ExitCode {
    match cli::determine_cmd(std::env::args()) {
        Err(e) => {
            eprintln!("{}", cli::usage_banner());
            eprintln!("tini: {e}");
            ExitCode::from(e.code)
        }
        Ok(Cmd::Help) => {
            println!("{}", cli::usage_banner());
            ExitCode::SUCCESS
        }
        Ok(Cmd::Run(cfg)) => {
            tini_log::init_logging(cfg.verbosity);
            debug!("invocation: program={} args={:?}", cfg.program, cfg.args);
            match supervisor::run(&cfg.program, &cfg.args) {
                Ok(code) => ExitCode::from(code),
                Err(e) => {
                    ::log::error!("{e}");
                    ExitCode::from(e.code)
                }
            }
        }
    }
}
