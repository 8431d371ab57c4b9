//! Ctrl+C handling for the synchronous commands.
//!
//! A background thread waits for the signal. While nothing that needs
//! cleanup is in flight the process exits at once with a cancellation line.
//! Otherwise the flag is raised and the running step returns [`Interrupted`],
//! so the owning guards unwind and release what they hold. A second Ctrl+C
//! always exits.

use arf_logger as logger;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

static GLOBAL: Lazy<Interrupt> = Lazy::new(Interrupt::new);
static ACTIVE_SCOPES: AtomicUsize = AtomicUsize::new(0);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Operation cancelled")]
pub struct Interrupted;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flag raised by the process-wide Ctrl+C handler.
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_triggered() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Marks work that owns temporary resources. While any scope is alive,
/// Ctrl+C raises the flag instead of exiting.
#[derive(Debug)]
pub struct CleanupScope(());

impl CleanupScope {
    pub fn enter() -> Self {
        ACTIVE_SCOPES.fetch_add(1, Ordering::SeqCst);
        Self(())
    }
}

impl Drop for CleanupScope {
    fn drop(&mut self) {
        ACTIVE_SCOPES.fetch_sub(1, Ordering::SeqCst);
    }
}

fn exit_now(already_triggered: bool, active_scopes: usize) -> bool {
    already_triggered || active_scopes == 0
}

/// Spawn the signal listener.
pub fn install() -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    std::thread::Builder::new()
        .name("arf-interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async {
                while tokio::signal::ctrl_c().await.is_ok() {
                    let interrupt = Interrupt::global();
                    let already = interrupt.is_triggered();
                    interrupt.trigger();
                    if exit_now(already, ACTIVE_SCOPES.load(Ordering::SeqCst)) {
                        eprintln!();
                        logger::error(&Interrupted.to_string());
                        std::process::exit(1);
                    }
                    logger::warn("Interrupted, cleaning up...");
                }
            });
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_follows_trigger() {
        let interrupt = Interrupt::new();
        assert_eq!(interrupt.check(), Ok(()));

        let shared = interrupt.clone();
        shared.trigger();
        assert_eq!(interrupt.check(), Err(Interrupted));
    }

    #[test]
    fn test_exit_only_without_cleanup_or_on_repeat() {
        assert!(exit_now(false, 0));
        assert!(!exit_now(false, 2));
        assert!(exit_now(true, 2));
    }
}
