use std::process::ExitCode;

fn main() -> ExitCode {
    acme_cli::run()
}
