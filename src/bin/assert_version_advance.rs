use clap::Parser;
use pre_commit_hooks::cli::{self, orchestration, VersionGateArgs};
use pre_commit_hooks::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = VersionGateArgs::parse();
    logging::init_logger(args.common.verbose);

    cli::finish(orchestration::assert_version_advance(&args))
}
