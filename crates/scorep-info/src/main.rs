mod cli;
mod cli_utils;
mod error;

use clap::Parser;

use cli::{Action, Opt};

fn main() {
    env_logger::init();

    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let result = match opt.action {
        Action::SystemTree => cli_utils::print_system_tree(),
        Action::ConfigVars { json } => cli_utils::print_config_vars(json),
    };

    if let Err(err) = result {
        eprintln!("scorep-info: {err}");
        std::process::exit(1);
    }
}
