use std::process::ExitCode;

fn main() -> ExitCode {
    modebot_cli::run()
}
