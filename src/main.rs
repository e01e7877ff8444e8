#[actix_web::main]
async fn main() -> std::io::Result<()> {
    texform_server::run().await
}
