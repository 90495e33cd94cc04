#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod forecast;
mod optimizer;
mod planner;
mod prelude;
mod quantity;
#[cfg(test)]
mod testing;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Plan(args) => cli::plan(&args)?,
        Command::Compare(args) => cli::compare(&args)?,
    }

    info!("done!");
    Ok(())
}
