use nix::sys::signal::{SigSet, SigmaskHow, Signal, pthread_sigmask};

use crate::error::TiniResult;

/// Synchronous fault signals: genuine bugs in the supervisor itself.
/// These stay out of the parent mask so they keep their default
/// disposition (core dump / termination) instead of being queued for
/// synchronous retrieval by the signal waiter.
const FAULT_SIGNALS: [Signal; 7] = [
    Signal::SIGFPE,
    Signal::SIGILL,
    Signal::SIGSEGV,
    Signal::SIGBUS,
    Signal::SIGABRT,
    Signal::SIGTRAP,
    Signal::SIGSYS,
];

/// Every catchable signal except the fault set.
fn parent_mask() -> SigSet {
    let mut mask = SigSet::all();
    for sig in FAULT_SIGNALS {
        mask.remove(sig);
    }
    mask
}

/// Install `mask` as the process's signal mask, returning the mask
/// that was in effect beforehand.
fn install(mask: &SigSet) -> TiniResult<SigSet> {
    let mut previous = SigSet::empty();
    pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(mask), Some(&mut previous))?;
    Ok(previous)
}

/// Compute the parent mask, install it on the current process, and
/// return `(parent_mask, child_mask)` where `child_mask` is the mask
/// that was in effect before the supervisor started (to be restored
/// in the main child just before exec).
pub fn prepare_masks() -> TiniResult<(SigSet, SigSet)> {
    let parent = parent_mask();
    let child = install(&parent)?;
    Ok((parent, child))
}
