//! Timing utilities
//!
//! `Timer` is the monotonic stopwatch every worker uses for its elapsed time.
//! `Budget` wraps a timer with the session's wall-clock limit and is polled
//! by the executor after every open, seek and read.

use std::time::{Duration, Instant};

/// Monotonic stopwatch
///
/// `elapsed_ns` reports the span between the last `start` and the last `stop`.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
    stopped: Instant,
}

impl Timer {
    /// Create a timer that is already started
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            stopped: now,
        }
    }

    /// Restart the timer
    #[inline]
    pub fn start(&mut self) {
        let now = Instant::now();
        self.started = now;
        self.stopped = now;
    }

    /// Record the stop point and return the elapsed nanoseconds
    #[inline]
    pub fn stop(&mut self) -> u64 {
        self.stopped = Instant::now();
        self.elapsed_ns()
    }

    /// Nanoseconds between the last start and the last stop
    #[inline]
    pub fn elapsed_ns(&self) -> u64 {
        self.stopped.duration_since(self.started).as_nanos() as u64
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock budget for one worker
///
/// There is no cancellation signal: the worker polls `exceeded` and stops
/// issuing I/O once it returns true.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    timer: Timer,
    limit_ns: u64,
}

impl Budget {
    /// Start a budget of `limit` from now
    pub fn start(limit: Duration) -> Self {
        Self {
            timer: Timer::new(),
            limit_ns: u64::try_from(limit.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    /// A budget that never runs out
    pub fn unlimited() -> Self {
        Self {
            timer: Timer::new(),
            limit_ns: u64::MAX,
        }
    }

    /// Stop the timer and report whether the limit has been reached
    #[inline]
    pub fn exceeded(&mut self) -> bool {
        self.timer.stop() >= self.limit_ns
    }

    /// Elapsed nanoseconds as of the last poll
    #[inline]
    pub fn elapsed_ns(&self) -> u64 {
        self.timer.elapsed_ns()
    }

    /// Take a final reading and return the elapsed nanoseconds
    pub fn finish(&mut self) -> u64 {
        self.timer.stop()
    }
}

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use recbench::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Format a rate (items per second)
pub fn format_rate(rate: f64) -> String {
    if rate < 1_000.0 {
        format!("{:.0}", rate)
    } else if rate < 1_000_000.0 {
        format!("{:.2}K", rate / 1_000.0)
    } else if rate < 1_000_000_000.0 {
        format!("{:.2}M", rate / 1_000_000.0)
    } else {
        format!("{:.2}G", rate / 1_000_000_000.0)
    }
}

/// Items per second over `elapsed_ns` nanoseconds; zero when nothing elapsed
pub fn per_second(count: u64, elapsed_ns: u64) -> f64 {
    if elapsed_ns == 0 {
        return 0.0;
    }
    count as f64 / (elapsed_ns as f64 / 1e9)
}

/// Format throughput in human-readable form (B/s, KB/s, MB/s, GB/s)
///
/// # Examples
///
/// ```
/// use recbench::util::time::format_throughput;
///
/// assert_eq!(format_throughput(500.0), "500.00 B/s");
/// assert_eq!(format_throughput(1536.0), "1.50 KB/s");
/// assert_eq!(format_throughput(2_621_440.0), "2.50 MB/s");
/// ```
pub fn format_throughput(bytes_per_sec: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    if bytes_per_sec >= TB {
        format!("{:.2} TB/s", bytes_per_sec / TB)
    } else if bytes_per_sec >= GB {
        format!("{:.2} GB/s", bytes_per_sec / GB)
    } else if bytes_per_sec >= MB {
        format!("{:.2} MB/s", bytes_per_sec / MB)
    } else if bytes_per_sec >= KB {
        format!("{:.2} KB/s", bytes_per_sec / KB)
    } else {
        format!("{:.2} B/s", bytes_per_sec)
    }
}
