#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use webhook_probe::{Error, config::Args};
use webhook_probe_http::Client;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    let args = Args::parse();
    let url = args.target_url();
    log::debug!("args={args:?} url={url}");

    let client = Client::new();
    let mut stdout = std::io::stdout().lock();

    // Probe outcomes, failures included, are reported on stdout and never
    // change the exit status.
    webhook_probe::run(&client, &url, &mut stdout).await?;

    Ok(())
}
