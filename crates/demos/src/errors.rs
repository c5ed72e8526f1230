use fanout_channels::ChannelError;
use fanout_sync::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("channel closed before the demonstration received every value")]
    ChannelDrained,

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("demonstration task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("unknown demonstration {0:?}")]
    UnknownDemo(String),
}

pub type DemoResult<T> = std::result::Result<T, DemoError>;
