use std::ffi::CString;
use std::process;

use nix::sys::signal::{SigSet, SigmaskHow, pthread_sigmask};
use nix::unistd::{ForkResult, Pid, execvp, fork};

use crate::error::{TiniError, TiniResult};

/// Fork a new process, restore `child_mask` in it, and replace its
/// image with `program`/`args`. Returns the child's PID to the caller
/// (the parent); never returns in the child.
///
/// Unlike a container-runtime monitor spawning its workload, this
/// does not `setsid`, does not redirect stdio, and does not
/// double-fork: the main child inherits the supervisor's controlling
/// terminal and stdio directly, by design (see Non-goals).
pub fn spawn(child_mask: &SigSet, program: &str, args: &[String]) -> TiniResult<Pid> {
    let program_c =
        CString::new(program).map_err(|_| TiniError::fatal("program name contains a NUL byte"))?;
    let mut argv_c = Vec::with_capacity(args.len() + 1);
    argv_c.push(program_c.clone());
    for arg in args {
        argv_c.push(
            CString::new(arg.as_str())
                .map_err(|_| TiniError::fatal("argument contains a NUL byte"))?,
        );
    }

    // SAFETY: the child performs only async-signal-safe work (a
    // sigmask restore and an exec) before either replacing its image
    // or exiting.
    unsafe {
        match fork() {
            Ok(ForkResult::Parent { child }) => return Ok(child),
            Ok(ForkResult::Child) => {}
            Err(e) => return Err(TiniError::new(format!("failed to fork: {e}"), 1)),
        }
    }

    // From here on we are the child, about to become `program`.
    if let Err(e) = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(child_mask), None) {
        ::log::error!("failed to restore signal mask in child: {e}");
        process::exit(1);
    }

    match execvp(&program_c, &argv_c) {
        Ok(_) => unreachable!("execvp only returns on error"),
        Err(e) => {
            ::log::error!("exec of {program} failed: {e}");
            process::exit(1);
        }
    }
}
