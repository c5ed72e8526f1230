use std::{fmt, future::Future, str::FromStr};

use fanout_config::DemoConfig;
use fanout_sync::{spawn_tracked, SyncError, WaitGroup};

use crate::{
    completion::wait_group,
    errors::{DemoError, DemoResult},
    handoff::{buffered, closing, ranged, unbuffered},
    racing::selecting,
    tasks::{sequential, spawned},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demo {
    All,
    Sequential,
    Spawned,
    Unbuffered,
    Buffered,
    Ranged,
    Closing,
    Selecting,
    WaitGroup,
    OtherTasks,
}

impl Demo {
    pub const EVERY: [Demo; 10] = [
        Demo::All,
        Demo::Sequential,
        Demo::Spawned,
        Demo::Unbuffered,
        Demo::Buffered,
        Demo::Ranged,
        Demo::Closing,
        Demo::Selecting,
        Demo::WaitGroup,
        Demo::OtherTasks,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Demo::All => "all",
            Demo::Sequential => "sequential",
            Demo::Spawned => "spawned",
            Demo::Unbuffered => "unbuffered",
            Demo::Buffered => "buffered",
            Demo::Ranged => "ranged",
            Demo::Closing => "closing",
            Demo::Selecting => "selecting",
            Demo::WaitGroup => "wait-group",
            Demo::OtherTasks => "other-tasks",
        }
    }

    #[must_use]
    pub fn about(self) -> &'static str {
        match self {
            Demo::All => "run the whole demonstration sequence",
            Demo::Sequential => "triple each input one after another",
            Demo::Spawned => "triple each input in its own task",
            Demo::Unbuffered => "producers and a consumer meeting on an unbuffered channel",
            Demo::Buffered => "fill a buffered channel without a receiver",
            Demo::Ranged => "consume a channel until it is closed",
            Demo::Closing => "receive from a channel after closing it",
            Demo::Selecting => "race two channels with select",
            Demo::WaitGroup => "join tasks with a wait group",
            Demo::OtherTasks => "do something else meanwhile",
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Demo {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Demo::EVERY
            .into_iter()
            .find(|demo| demo.name() == s)
            .ok_or_else(|| DemoError::UnknownDemo(s.to_string()))
    }
}

/// How [`run_all`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub finished: bool,
    pub outstanding: usize,
}

pub fn other_tasks() {
    println!("Another important tasks");
}

/// Runs a single demonstration, or the whole sequence for [`Demo::All`].
///
/// # Errors
///
/// Whatever the demonstration itself reports.
pub async fn run(demo: Demo, config: &DemoConfig) -> DemoResult<()> {
    fanout_trace::info!(%demo, "running demonstration");

    match demo {
        Demo::All => {
            run_all(config).await?;
        }
        Demo::Sequential => {
            sequential(config).await;
        }
        Demo::Spawned => {
            let group = WaitGroup::new();
            spawned(config, &group);
            group.wait_timeout(config.run_for).await?;
        }
        Demo::Unbuffered => {
            unbuffered(config).await?;
        }
        Demo::Buffered => {
            buffered(config).await?;
        }
        Demo::Ranged => {
            ranged(config).await?;
        }
        Demo::Closing => {
            closing(config).await?;
        }
        Demo::Selecting => {
            selecting(config).await?;
        }
        Demo::WaitGroup => {
            wait_group(config).await?;
        }
        Demo::OtherTasks => other_tasks(),
    }

    Ok(())
}

async fn report<T>(demo: Demo, outcome: impl Future<Output = DemoResult<T>>) {
    match outcome.await {
        Ok(_) => fanout_trace::debug!(%demo, "demonstration finished"),
        Err(err) => fanout_trace::error!(%demo, %err, "demonstration failed"),
    }
}

/// Starts the demonstration sequence, most of it in the
/// background, then waits for the background ones for at most
/// `config.run_for`. Running out of budget is reported in the summary, not as
/// an error.
///
/// # Errors
///
/// Only the inline buffered demonstration can fail the run.
pub async fn run_all(config: &DemoConfig) -> DemoResult<RunSummary> {
    let background = WaitGroup::new();

    spawned(config, &background);

    let owned = config.clone();
    spawn_tracked(
        &background,
        report(Demo::Unbuffered, async move { unbuffered(&owned).await }),
    );

    buffered(config).await?;

    let owned = config.clone();
    spawn_tracked(
        &background,
        report(Demo::Ranged, async move { ranged(&owned).await }),
    );

    let owned = config.clone();
    spawn_tracked(
        &background,
        report(Demo::Closing, async move { closing(&owned).await }),
    );

    let owned = config.clone();
    spawn_tracked(
        &background,
        report(Demo::Selecting, async move { selecting(&owned).await }),
    );

    let owned = config.clone();
    spawn_tracked(
        &background,
        report(Demo::WaitGroup, async move { wait_group(&owned).await }),
    );

    other_tasks();

    let summary = match background.wait_timeout(config.run_for).await {
        Ok(()) => RunSummary {
            finished: true,
            outstanding: 0,
        },
        Err(SyncError::TimedOut { outstanding, .. }) => {
            fanout_trace::warn!(
                outstanding,
                "run budget elapsed before every demonstration finished"
            );
            RunSummary {
                finished: false,
                outstanding,
            }
        }
    };

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_names_parse_back() {
        for demo in Demo::EVERY {
            assert_eq!(demo.name().parse::<Demo>().expect("known name"), demo);
            assert_eq!(demo.to_string(), demo.name());
        }
    }

    #[test]
    fn unknown_demo_names_are_rejected() {
        assert!(matches!(
            "deadlock".parse::<Demo>(),
            Err(DemoError::UnknownDemo(name)) if name == "deadlock"
        ));
    }
}
