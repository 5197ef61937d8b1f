use pre_commit_hooks::cli::{self, orchestration};
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::exit_code(orchestration::test_hook(std::env::args().skip(1)))
}
