use std::time::Duration;

use clap::builder::PossibleValue;
use fanout_config::DemoConfig;
use fanout_demos::Demo;
use fanout_trace::LogFormat;

use crate::BoxedError;

pub fn register(command: clap::Command) -> clap::Command {
    let demos: Vec<PossibleValue> = Demo::EVERY
        .iter()
        .map(|demo| PossibleValue::new(demo.name()).help(demo.about()))
        .collect();

    command
        .arg(
            clap::Arg::new("config")
                .long("config")
                .help("TOML file overriding the default delays, worker counts and logging")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            clap::Arg::new("work_delay_ms")
                .long("work-delay-ms")
                .help("delay of each simulated tripling, in milliseconds")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            clap::Arg::new("run_for_secs")
                .long("run-for-secs")
                .help("how long to wait for background demonstrations")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            clap::Arg::new("log_level")
                .long("log-level")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            clap::Arg::new("log_format")
                .long("log-format")
                .action(clap::ArgAction::Set)
                .value_parser(["compact", "json"]),
        )
        .arg(
            clap::Arg::new("demo")
                .action(clap::ArgAction::Set)
                .value_parser(clap::builder::PossibleValuesParser::new(demos))
                .default_value("all"),
        )
}

fn load_config(args: &clap::ArgMatches) -> std::result::Result<DemoConfig, BoxedError> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => fanout_config::from_path::<DemoConfig, _>(path)?,
        None => DemoConfig::default(),
    };

    if let Some(millis) = args.get_one::<u64>("work_delay_ms") {
        config = config.with_work_delay(Duration::from_millis(*millis));
    }
    if let Some(secs) = args.get_one::<u64>("run_for_secs") {
        config = config.with_run_for(Duration::from_secs(*secs));
    }
    if let Some(level) = args.get_one::<String>("log_level") {
        config = config.with_log_level(level.as_str());
    }
    if let Some(format) = args.get_one::<String>("log_format") {
        config = config.with_log_format(format.as_str());
    }

    config.validate()?;
    Ok(config)
}

pub async fn run(args: &clap::ArgMatches) -> std::result::Result<(), BoxedError> {
    let config = load_config(args)?;

    let level = fanout_trace::parse_level(&config.log_level)?;
    let format: LogFormat = config.log_format.parse()?;
    fanout_trace::init_subscriber(level, format)?;

    let demo: Demo = args
        .get_one::<String>("demo")
        .map_or(Demo::All.name(), String::as_str)
        .parse()?;

    tracing::info!(
        %demo,
        work_delay = ?config.work_delay,
        run_for = ?config.run_for,
        "Starting fanout"
    );

    fanout_demos::run(demo, &config).await?;
    Ok(())
}
