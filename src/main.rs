use std::fs::File;

use anyhow::Context;
use clap::Parser;
use env_logger::{Env, Target};
use log::{info, LevelFilter};

use term_2048::config::Args;
use term_2048::session::Session;
use term_2048::terminal::TerminalScreen;

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        // stderr shares the screen with the board; stay quiet unless asked
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(LevelFilter::Off);
        }
        None => {}
    }
    builder.init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let config = args.session_config()?;
    info!(
        "starting: size={}, win_target={}, seed={:?}",
        config.size, config.win_target, config.seed
    );

    let screen = TerminalScreen::begin().context("failed to set up terminal")?;
    let mut session = Session::new(config, screen)?;
    let result = session.run();
    let mut screen = session.into_presenter();
    screen.end().context("failed to restore terminal")?;
    result.context("game session failed")
}
