pub mod graph;
pub mod monitor;

pub use graph::GraphWidget;
pub use monitor::{BufferSet, MonitorWidget};
