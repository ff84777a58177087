mod install;
mod link;
mod uninstall;

use anyhow::Result;
use dotenv::dotenv;
use clap::Command;

fn cli() -> Command {
  Command::new("dotkit")
    .about("A dotfiles toolkit that symlinks configuration into $HOME and installs an OpenAI commit-message hook")
    .subcommand_required(true)
    .arg_required_else_help(true)
    .subcommand(Command::new("link").about("Symlinks the declared dotfiles into the home directory"))
    .subcommand(Command::new("install").about("Installs the dotkit prepare-commit-msg hook"))
    .subcommand(Command::new("uninstall").about("Uninstalls the dotkit prepare-commit-msg hook"))
}

fn main() -> Result<()> {
  env_logger::init();
  dotenv().ok();

  let args = cli().get_matches();

  match args.subcommand() {
    Some(("link", _)) => link::run()?,
    Some(("install", _)) => install::run()?,
    Some(("uninstall", _)) => uninstall::run()?,
    _ => unreachable!()
  }

  Ok(())
}
