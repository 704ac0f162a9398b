mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    match app::run() {
        Ok(code) => code,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
