mod demo;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> std::result::Result<(), BoxedError> {
    let commander = demo::register(
        clap::Command::new("fanout")
            .about("Demonstrations of tasks, handoff channels, select and wait groups"),
    );

    let matches = commander.get_matches();
    demo::run(&matches).await
}
