use clap::Parser;
use colored::Colorize;

use studyfocus::cli::args::{Cli, Commands};
use studyfocus::cli::commands::{self, Context};
use studyfocus::error::StudyFocusError;
use studyfocus::logging::init_logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), StudyFocusError> {
    let cli = Cli::parse();
    let ctx = Context::from_cli(&cli)?;
    ctx.config.general.color.apply();

    // The TUI owns the terminal, so its logs go to a file
    if matches!(&cli.command, Commands::Run(args) if !args.plain) {
        ctx.paths.ensure_dirs()?;
        init_logging(cli.verbose, Some(&ctx.paths.log_file))?;
    } else {
        init_logging(cli.verbose, None)?;
    }

    let format = ctx.format;
    let output = match cli.command {
        Commands::Run(args) => commands::run(&ctx, &args)?,
        Commands::Stats { goal, period } => {
            let store = ctx.open_store()?;
            let goal = goal.unwrap_or(ctx.config.stats.weekly_goal_minutes);
            commands::stats(store.as_ref(), &period, goal, format)?
        }
        Commands::History {
            since,
            until,
            limit,
        } => {
            let store = ctx.open_store()?;
            commands::history(store.as_ref(), since.as_deref(), until.as_deref(), limit, format)?
        }
        Commands::Clear { force } => {
            let mut store = ctx.open_store()?;
            commands::clear(store.as_mut(), force, format)?
        }
        Commands::Config(args) => commands::config(&ctx.paths, &ctx.config, args.command, format)?,
        Commands::Completions { shell, install } => commands::completions(shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
