use std::time::Duration;

use super::mask;
use super::reap::reap_all;
use super::spawn::spawn;
use super::wait::SignalWaiter;
use crate::error::TiniResult;

/// Fixed poll interval for the signal waiter: bounds how long a
/// descendant termination can linger unreaped when no forwardable
/// signal is flowing. Not exposed as a runtime knob (see design
/// notes).
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Starting -> Running -> Terminating.
///
/// Prepares the signal masks, spawns `program` as the main child, and
/// runs forward-then-reap each iteration until the main child's exit
/// code is known. Returns the exit code this supervisor process
/// itself should exit with.
pub fn run(program: &str, args: &[String]) -> TiniResult<u8> {
    let (parent_mask, child_mask) = mask::prepare_masks()?;
    let mut waiter = SignalWaiter::new(&parent_mask)?;

    let main_child = spawn(&child_mask, program, args)?;
    ::log::info!("spawned main child {main_child} ({program})");

    let mut main_exit_code: Option<u8> = None;
    loop {
        waiter.wait_and_forward(POLL_INTERVAL, main_child)?;
        // reap_all always drains every currently-available
        // termination, so once it has observed the main child there
        // cannot be a "pending reap" left over from this iteration.
        reap_all(main_child, &mut main_exit_code)?;
        if let Some(code) = main_exit_code {
            return Ok(code);
        }
    }
}
