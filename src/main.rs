#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Delegate to the framework entry point.
    kaboom_arena::run_with_config().await
}
