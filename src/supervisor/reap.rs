use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

use crate::error::{TiniError, TiniResult};

/// Drain every currently-terminated descendant without blocking.
///
/// Loops until the kernel reports either "none ready" (`StillAlive`)
/// or "no descendants at all" (`ECHILD`), both of which are success.
/// When the reaped descendant is `main_child`, its translated exit
/// code is written into `main_exit_code` — by construction this can
/// only happen once, since the kernel never reports the same
/// terminated PID twice.
pub fn reap_all(main_child: Pid, main_exit_code: &mut Option<u8>) -> TiniResult<()> {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, status)) => {
                record(pid, main_child, main_exit_code, status as u8);
            }
            Ok(WaitStatus::Signaled(pid, sig, _)) => {
                let code = 128i32.wrapping_add(sig as i32) as u8;
                record(pid, main_child, main_exit_code, code);
            }
            Ok(WaitStatus::StillAlive) => return Ok(()),
            Err(Errno::ECHILD) => return Ok(()),
            Err(Errno::EINTR) => continue,
            Ok(other) => {
                return Err(TiniError::fatal(format!(
                    "unrecognized termination status for a descendant: {other:?}"
                )));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn record(pid: Pid, main_child: Pid, main_exit_code: &mut Option<u8>, code: u8) {
    if pid == main_child {
        ::log::debug!("main child {pid} exited with code {code}");
        *main_exit_code = Some(code);
    } else {
        ::log::debug!("reaped descendant {pid}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::{ForkResult, fork, getpid};
    use std::process;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn no_descendants_is_success() {
        // This process may or may not have outstanding children
        // depending on test ordering; what matters is that neither
        // ECHILD nor StillAlive is treated as an error.
        let mut code = None;
        let main_child = Pid::from_raw(999_999); // not our child
        let result = reap_all(main_child, &mut code);
        assert!(result.is_ok());
        assert_eq!(code, None);
    }

    #[test]
    fn main_child_normal_exit_is_recorded() {
        match unsafe { fork() }.expect("fork") {
            ForkResult::Child => process::exit(42),
            ForkResult::Parent { child } => {
                sleep(Duration::from_millis(50));
                let mut code = None;
                loop {
                    reap_all(child, &mut code).expect("reap");
                    if code.is_some() {
                        break;
                    }
                    sleep(Duration::from_millis(10));
                }
                assert_eq!(code, Some(42));
            }
        }
    }

    #[test]
    fn main_child_signal_death_is_128_plus_signal() {
        match unsafe { fork() }.expect("fork") {
            ForkResult::Child => {
                kill(getpid(), Signal::SIGTERM).expect("self-signal");
                process::exit(1); // unreachable if the signal is delivered
            }
            ForkResult::Parent { child } => {
                sleep(Duration::from_millis(50));
                let mut code = None;
                loop {
                    reap_all(child, &mut code).expect("reap");
                    if code.is_some() {
                        break;
                    }
                    sleep(Duration::from_millis(10));
                }
                assert_eq!(code, Some(128 + Signal::SIGTERM as u8));
            }
        }
    }

    #[test]
    fn non_main_descendants_do_not_set_exit_code() {
        match unsafe { fork() }.expect("fork") {
            ForkResult::Child => process::exit(0),
            ForkResult::Parent { child } => {
                sleep(Duration::from_millis(50));
                let unrelated_main = Pid::from_raw(child.as_raw() + 1_000_000);
                let mut code = None;
                reap_all(unrelated_main, &mut code).expect("reap");
                assert_eq!(code, None);
            }
        }
    }
}
