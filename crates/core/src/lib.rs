pub mod buffer;
pub mod error;
pub mod event;
pub mod metric;

pub use buffer::{SampleBuffer, DEFAULT_CAPACITY};
pub use error::{MonitorError, Result};
pub use event::Message;
pub use metric::{MetricKind, Reading};
