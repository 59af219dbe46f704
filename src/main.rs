use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use git_velocity::cli::{self, Args, Defaults, OutputMode, TerminalPrompter};
use git_velocity::model::TakeWhile;
use git_velocity::service::Velocity;
use git_velocity::{logging, output, tui, App, AppResult, CommitClient, ServiceConfig, Tui};

#[tokio::main]
async fn main() -> ExitCode {
    tui::install_panic_hook();

    // Logging is optional; the tool works without a log file
    let _ = logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<()> {
    let args = Args::parse();
    let mut prompter = TerminalPrompter::new();

    println!("{}", output::banner());
    println!();

    let defaults = Defaults::from_dir(&std::env::current_dir()?);
    let inputs = cli::resolve_inputs(&args, &defaults, &mut prompter)?;

    let client = CommitClient::connect(inputs.provider, &ServiceConfig::default())?;
    if cli::ensure_credentials(&client, args.no_prompt, &mut prompter)? {
        println!("Stored {} credentials.", inputs.provider);
    }

    let now = Utc::now();
    info!(
        provider = %inputs.provider,
        owner = %inputs.owner,
        repository = %inputs.repository,
        format = %inputs.format,
        "Starting run"
    );

    match args.output {
        OutputMode::Dashboard => {
            let mut tui = Tui::new()?;
            let mut app = App::new(client, inputs, now);
            app.run(&mut tui).await
        }
        OutputMode::Plain => {
            let velocity = Velocity::new(inputs.format);
            let stop = velocity.stop_predicate(now);
            let take_while: &TakeWhile = &stop;

            let spinner = output::spinner("Pulling commits...");
            let result = client
                .get_commits_by_repo(&inputs.repository, &inputs.owner, Some(take_while))
                .await;
            spinner.finish_and_clear();

            let report = velocity.summarize(&result?, now);
            println!();
            print!("{}", output::render_report(&report));
            Ok(())
        }
    }
}
