#[tokio::main]
async fn main() {
    classbook_backend::run().await;
}
