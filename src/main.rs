#[actix_web::main]
async fn main() -> std::io::Result<()> {
    excel_print_server::run().await
}
