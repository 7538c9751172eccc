use clap::Parser as _;
use dotenvy::dotenv;
use index_bootstrapper::cli::{Cli, Commands};
use index_bootstrapper::setup::{apply, verify};
use index_bootstrapper::types::report::IndexOutcome;
use index_bootstrapper::utils::logging::init_logging;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Runs once at container start, on a single thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Apply { apply_command } => {
            info!("Executing apply command with args: {:?}", apply_command);
            match apply(apply_command).await {
                Ok(report) if report.is_success() => {
                    info!(namespace = %report.namespace, "Index bootstrap completed successfully");
                    ExitCode::SUCCESS
                }
                Ok(report) => {
                    for conflict in report.conflicts() {
                        if let IndexOutcome::Conflict { reason } = &conflict.outcome {
                            error!(index = %conflict.name, reason = %reason, "Index left in conflict");
                        }
                    }
                    error!(
                        namespace = %report.namespace,
                        conflicts = report.conflicts().len(),
                        "Index bootstrap finished with conflicts"
                    );
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(
                        error = %e,
                        error_chain = ?e,
                        "Failed to bootstrap indexes"
                    );
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Verify { verify_command } => {
            info!("Executing verify command with args: {:?}", verify_command);
            match verify(verify_command).await {
                Ok(report) if report.is_satisfied() => {
                    info!(namespace = %report.namespace, "All indexes are present and match");
                    ExitCode::SUCCESS
                }
                Ok(report) => {
                    warn!(namespace = %report.namespace, "Collection or indexes do not match the index set");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(
                        error = %e,
                        error_chain = ?e,
                        "Failed to verify indexes"
                    );
                    ExitCode::FAILURE
                }
            }
        }
    }
}
