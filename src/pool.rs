//! Worker pool sizing.
//!
//! Both kernels run on the Rayon pool of whichever thread calls them. This
//! module builds that pool from a single knob, the number of workers, which
//! defaults to every hardware thread the OS reports.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{validation_error, Result};

/// Environment variable the CLI reads the worker count from.
pub const THREADS_ENV: &str = "TILEGEMM_THREADS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Worker count. `None` means all available hardware threads.
    pub threads: Option<usize>,
}

impl PoolConfig {
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads),
        }
    }

    /// The worker count this configuration resolves to on this machine.
    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    fn builder(&self) -> Result<ThreadPoolBuilder> {
        let threads = self.resolved_threads();
        if threads == 0 {
            return Err(validation_error("thread count must be positive"));
        }
        Ok(ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tilegemm-{i}")))
    }

    /// Builds a dedicated pool. Run kernels inside it with
    /// [`ThreadPool::install`].
    pub fn build(&self) -> Result<ThreadPool> {
        let pool = self.builder()?.build()?;
        debug!(threads = pool.current_num_threads(), "built worker pool");
        Ok(pool)
    }

    /// Configures Rayon's global pool. Fails if it was already initialised.
    pub fn install_global(&self) -> Result<()> {
        self.builder()?.build_global()?;
        debug!(threads = rayon::current_num_threads(), "configured global pool");
        Ok(())
    }
}
