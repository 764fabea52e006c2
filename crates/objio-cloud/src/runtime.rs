//! Tokio runtime management for synchronous operations

use crate::error::{CloudError, Result};
use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

/// Get or create the shared Tokio runtime for blocking operations
pub(crate) fn get_runtime() -> Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();

    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }

    let runtime = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("objio-cloud-worker")
        .build()
        .map_err(|e| CloudError::Runtime(format!("failed to create Tokio runtime: {}", e)))?;

    // A runtime built by a losing thread is dropped here
    Ok(RUNTIME.get_or_init(move || runtime))
}

/// Drive `future` to completion on the shared runtime
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    Ok(get_runtime()?.block_on(future))
}
