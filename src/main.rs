mod app;
mod ui;

use std::process::ExitCode;

use clipvault::VaultError;

fn main() -> ExitCode {
    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<VaultError>() {
            Some(err) if err.is_fatal() => {
                eprintln!("Fatal: {err}");
                ExitCode::from(2)
            }
            Some(err) => {
                eprintln!("Error: {}", err.user_message());
                ExitCode::FAILURE
            }
            None => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}
