//! Runtime setup done once at startup.

use tracing::debug;

/// Configure the global rayon pool; `jobs == 0` uses every core.
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        debug!(error = %e, "Thread pool already configured");
    }
}

/// Number of worker threads a `--jobs` value stands for.
pub fn worker_count(jobs: usize) -> usize {
    if jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs
    }
}
