// Worker constants (no magic values)
use std::time::Duration;

/// Worker pool size when not configured
pub const DEFAULT_WORKER_COUNT: usize = 30;

/// Jobs the queue buffers before admission starts waiting
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// How long `enqueue` waits on a full buffer before reporting QueueFull
pub const DEFAULT_ADMISSION_TIMEOUT: Duration = Duration::from_millis(250);

/// Upper bound (exclusive) of the simulated render latency (100s)
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(100);

/// Producer call timeout
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// How long shutdown waits for in-flight jobs
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
