use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    caredesk_lib::run().await
}
