use clap::Parser;

use crate::DEFAULT_WEBHOOK_URL;

/// Environment variable consulted when no URL argument is given.
pub const WEBHOOK_URL_ENV: &str = "N8N_WEBHOOK_URL";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Webhook URL to probe [default: $N8N_WEBHOOK_URL, then the built-in webhook]
    #[arg(index = 1)]
    pub url: Option<String>,
}

impl Args {
    #[must_use]
    pub fn target_url(&self) -> String {
        resolve_url(self.url.clone(), std::env::var(WEBHOOK_URL_ENV).ok())
    }
}

/// Argument first, then environment, then [`DEFAULT_WEBHOOK_URL`]. Blank
/// values count as unset.
#[must_use]
pub fn resolve_url(arg: Option<String>, env: Option<String>) -> String {
    let present = |x: &String| !x.trim().is_empty();

    arg.filter(present)
        .or_else(|| env.filter(present))
        .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string())
}
