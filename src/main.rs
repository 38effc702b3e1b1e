#[tokio::main]
async fn main() {
    corella_backend::run().await;
}
