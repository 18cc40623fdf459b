use std::process::ExitCode;

fn main() -> ExitCode {
    quoteboard_cli::run()
}
