#[tokio::main]
async fn main() {
    if arena_server::run_with_config().await.is_err() {
        std::process::exit(1);
    }
}
