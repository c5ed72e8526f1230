// Crate implementing closable handoff channels and select

use std::time::Duration;

use thiserror::Error;

mod mpmc;
mod select;

pub use mpmc::{buffered, unbuffered, ReceiveChannel, SendChannel};
pub use select::{select, select_any, Selected};

pub type Result<T> = anyhow::Result<T, ChannelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Channel has being closed")]
    Closed,

    #[error("Channel has no free capacity or no waiting receiver")]
    Full,

    #[error("Channel has nothing queued")]
    Empty,

    #[error("Channel operation did not complete within {0:?}")]
    TimedOut(Duration),
}
