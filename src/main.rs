use handoff::commands::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    Cli::menu()
}
