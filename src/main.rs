//! # Command Line Interface
//!
//! The subcommand handlers are in the `commands` module of the library;
//! `main` only dispatches.  The CLI tree itself is in `cli.rs`, which is
//! shared with the build script that generates shell completions.

use env_logger;
#[cfg(windows)]
use colored;
use log::error;
use msxtok::commands;
use msxtok::commands::CommandError;

mod cli;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap();

    let matches = cli::build_cli().get_matches();

    if let Some(cmd) = matches.subcommand_matches("tokenize") {
        return commands::langx::tokenize(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("detokenize") {
        return commands::langx::detokenize(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("dump") {
        return commands::langx::dump(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(cli::build_cli(),cmd);
    }

    error!("No subcommand was found, try `msxtok --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
