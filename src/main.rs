#[tokio::main]
async fn main() {
    if let Err(error) = shellboot_lib::run().await {
        shellboot_logging::log_error_fallback(&format!(
            "shellboot boot failed: code={}, message={}, causes={:?}",
            error.code,
            error.message,
            error.visible_causes()
        ));
        std::process::exit(1);
    }
}
