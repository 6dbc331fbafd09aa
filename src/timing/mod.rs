pub mod clock;

pub use clock::{timed, FrameTimer, FrameTiming};
pub use perf_test::{calculate_stats, PerfRecord, PerfResult, PerfSuite, PerfTest};
