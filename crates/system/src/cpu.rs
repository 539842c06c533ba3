use std::time::Duration;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

/// Global CPU utilisation averaged over `window`.
///
/// **Blocks the calling thread for `window`** (never shorter than
/// `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`): usage is the delta between two
/// refreshes, so an instantaneous reading does not exist.  Call this from a
/// blocking worker, never from a UI or async executor thread.
pub fn measure(sys: &mut System, window: Duration) -> f32 {
    sys.refresh_cpu_usage();
    std::thread::sleep(effective_window(window));
    sys.refresh_cpu_usage();
    sys.global_cpu_usage()
}

/// The averaging window actually slept by [`measure`].
pub fn effective_window(window: Duration) -> Duration {
    window.max(MINIMUM_CPU_UPDATE_INTERVAL)
}
