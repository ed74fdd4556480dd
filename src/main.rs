use clap::Parser;
use expense_tracker::args::{Args, Command};
use expense_tracker::{commands, Config, Result};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().expenses_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Signup(credentials) => {
            let config = Config::load(home).await?;
            commands::signup(config, credentials.clone()).await?.print()
        }

        Command::Login(credentials) => {
            let config = Config::load(home).await?;
            commands::login(config, credentials.clone()).await?.print()
        }

        Command::Logout => commands::logout(Config::load(home).await?)
            .await?
            .print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add(config, add_args.clone()).await?.print()
        }

        Command::Edit(edit_args) => {
            let config = Config::load(home).await?;
            commands::edit(config, edit_args.clone()).await?.print()
        }

        Command::Delete(id_args) => {
            let config = Config::load(home).await?;
            commands::delete(config, id_args.clone()).await?.print()
        }

        Command::Show(id_args) => {
            let config = Config::load(home).await?;
            commands::show(config, id_args.clone()).await?.print()
        }

        Command::Dashboard(dashboard_args) => {
            let config = Config::load(home).await?;
            commands::dashboard(config, dashboard_args.clone())
                .await?
                .print()
        }

        Command::Detail(detail_args) => {
            let config = Config::load(home).await?;
            commands::detail(config, detail_args.clone()).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this package only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
