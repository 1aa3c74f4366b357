use anyhow::Result;
use clap::Parser;
use oitc_inventory::cli::Cli;
use oitc_inventory::config::Configuration;

fn main() -> Result<()> {
    // stdout carries the inventory, logs go to stderr
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    let cli = Cli::parse();
    let config = Configuration::load()?;

    let output = oitc_inventory::run(&cli, &config)?;
    println!("{}", output);

    Ok(())
}
