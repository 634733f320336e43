use std::process::ExitCode;

use clap::Parser;

use aftercare_lib::config::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    aftercare_lib::init_tracing();

    match aftercare_lib::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
