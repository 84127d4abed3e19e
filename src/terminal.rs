//! Raw terminal mode with panic-safe restore.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while a guard holds raw mode, read by the panic hook
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Holds the terminal in raw mode until dropped.
///
/// Input is unbuffered and unechoed while the guard lives.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    /// Enter raw mode.
    ///
    /// # Errors
    /// Fails when there is no controlling terminal.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        log::debug!("raw mode on");
        Ok(Self { active: true })
    }

    /// Leave raw mode early. Dropping afterwards does nothing.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
            disable_raw_mode()?;
            log::debug!("raw mode off");
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
            // nowhere to report errors from drop
            let _ = disable_raw_mode();
        }
    }
}

pub fn raw_mode_active() -> bool {
    RAW_MODE_ACTIVE.load(Ordering::SeqCst)
}

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);
    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = disable_raw_mode();
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x1b[0m\r\n");
            let _ = stdout.flush();
        }
        original_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_enter_and_drop() {
        // CI has no TTY, raw mode is unavailable there
        match RawModeGuard::enter() {
            Ok(guard) => {
                assert!(guard.is_active());
                assert!(raw_mode_active());
                drop(guard);
                assert!(!raw_mode_active());
            }
            Err(e) => eprintln!("Skipping test (no TTY): {e}"),
        }
    }

    #[test]
    fn manual_exit_is_idempotent() {
        match RawModeGuard::enter() {
            Ok(mut guard) => {
                guard.exit().expect("leave raw mode");
                assert!(!guard.is_active());
                guard.exit().expect("second exit is a no-op");
                drop(guard);
                assert!(!raw_mode_active());
            }
            Err(e) => eprintln!("Skipping test (no TTY): {e}"),
        }
    }

    #[test]
    fn panic_hook_installs_once() {
        install_panic_hook();
        install_panic_hook();
    }
}
