use std::process::ExitCode;

fn main() -> ExitCode {
    match gstd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("gstd: {error}");
            ExitCode::FAILURE
        }
    }
}
