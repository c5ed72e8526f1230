//! Demonstrations of lightweight tasks, handoff channels, select and wait
//! groups. Each one prints what it does to stdout and returns what it saw.

mod completion;
mod errors;
mod handoff;
mod racing;
mod runner;
mod tasks;
mod work;

pub use completion::wait_group;
pub use errors::{DemoError, DemoResult};
pub use handoff::{
    buffered, closing, ranged, receive_from_channel, send_to_channel, unbuffered, CloseReport,
};
pub use racing::{a_very_long_time_process, selecting};
pub use runner::{other_tasks, run, run_all, Demo, RunSummary};
pub use tasks::{sequential, spawned};
pub use work::{calc_triple, calc_triple_and_print, calc_triple_to_channel, triple, WorkItem};
