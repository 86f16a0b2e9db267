use std::process::ExitCode;

fn main() -> ExitCode {
    shelfcast_cli::run()
}
