//! Result reporting
//!
//! `text` prints the argument echo and the final counters to stdout; `json`
//! writes a machine-readable `SessionReport`. Both work from the same
//! ordered list of effective arguments built here.

pub mod json;
pub mod text;

use crate::coordinator::Session;
use crate::plan::bounds::ExtentRange;
use crate::worker::Workload;

/// Effective argument: `(key, value)` in echo order
pub type Argument = (String, String);

/// Memory page size of the host, if the OS reports one
pub fn page_size() -> Option<u64> {
    // SAFETY: sysconf has no preconditions
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    (size > 0).then_some(size as u64)
}

/// Effective arguments of a prepared session
///
/// File-count and extent bounds are echoed as resolved, so ratios show up as
/// the concrete ranges the planner draws from.
pub fn session_arguments(session: &Session) -> Vec<Argument> {
    let mut args: Vec<Argument> = Vec::new();
    let mut push = |key: &str, value: String| args.push((key.to_string(), value));

    if let Some(page) = page_size() {
        push("page-size", page.to_string());
    }
    push("block-size", session.block_size().to_string());
    push("dir", session.catalog().dir().display().to_string());
    push("record-size", session.record_size().to_string());
    push("max-time", session.max_time().as_nanos().to_string());
    push("buffered", session.buffered().to_string());
    push("threads", session.threads().to_string());
    push("files", session.catalog().len().to_string());

    if session.workload() == Workload::Scan {
        let bounds = session.bounds();
        push(
            "file-ratio",
            format!("{},{}", bounds.files.min_files, bounds.files.max_files),
        );
        let extent = match bounds.extent.range {
            _ if bounds.extent.full_scan => "full".to_string(),
            ExtentRange::Ratio { min, max } => format!("{},{}", min, max),
            ExtentRange::Size { min, max } => format!("{}b,{}b", min, max),
        };
        push("size-ratio", extent);
        push("seq-file", bounds.shape.sequential_file_order.to_string());
        push("seq-scan", bounds.shape.sequential_scan_order.to_string());
        push("full-middle", bounds.shape.full_middle.to_string());
    }

    args
}
