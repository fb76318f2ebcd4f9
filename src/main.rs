use std::process::ExitCode;

fn main() -> ExitCode {
    verstamp::app::startup::startup()
}
