//! # roda
//!
//! Console entry point. See [`roda_storefront::cli`].

use std::process::ExitCode;

use clap::Parser;

use roda_storefront::cli::{run, Cli};
use roda_storefront::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            let rendered = serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string());
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(notice) => {
            let rendered = serde_json::to_string_pretty(&notice).unwrap_or_else(|_| notice.to_string());
            eprintln!("{rendered}");
            ExitCode::FAILURE
        }
    }
}
