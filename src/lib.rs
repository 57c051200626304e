#![allow(clippy::collapsible_if)]
pub mod cli;
pub mod error;
pub mod log;
pub mod supervisor;
