//! Sync-into-Async Bridging
//!
//! Lets synchronous callers drive gateway futures. The rule: code running
//! on a scheduling loop must never block waiting on that same loop. When a
//! tokio runtime is already current, the future runs on a dedicated worker
//! thread with its own runtime and the caller blocks on the join; otherwise
//! a runtime is built in place.

use std::future::Future;

use tokio::runtime::{Builder, Handle};

use crate::types::{RepoWikiError, Result};

/// Run an async gateway call from synchronous code.
pub fn run_blocking<F, T>(future: F) -> Result<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    if Handle::try_current().is_ok() {
        std::thread::spawn(move || -> Result<T> {
            let rt = new_runtime()?;
            Ok(rt.block_on(future))
        })
        .join()
        .map_err(|_| RepoWikiError::Transport("bridge worker thread panicked".to_string()))?
    } else {
        let rt = new_runtime()?;
        Ok(rt.block_on(future))
    }
}

fn new_runtime() -> Result<tokio::runtime::Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| RepoWikiError::Config(format!("Failed to build bridge runtime: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_blocking_outside_runtime() {
        let result = run_blocking(async { 40 + 2 }).unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn test_run_blocking_inside_runtime_does_not_deadlock() {
        // Calling from a worker already on a loop must complete rather than
        // block the loop on itself.
        let result =
            tokio::task::spawn_blocking(|| run_blocking(async { "bridged".to_string() }))
                .await
                .unwrap()
                .unwrap();
        assert_eq!(result, "bridged");
    }

    #[test]
    fn test_run_blocking_propagates_future_output() {
        let result: Result<std::result::Result<u8, String>> =
            run_blocking(async { Err::<u8, _>("inner".to_string()) });
        assert_eq!(result.unwrap(), Err("inner".to_string()));
    }
}
