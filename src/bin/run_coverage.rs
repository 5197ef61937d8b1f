use pre_commit_hooks::cli::{self, orchestration, HookArgs};
use pre_commit_hooks::hooks::HookKind;
use pre_commit_hooks::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = HookArgs::parse_for(HookKind::RunCoverage);
    logging::init_logger(args.common.verbose);

    cli::finish(orchestration::run_coverage(&args))
}
