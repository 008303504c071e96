//! Backend Binary
//!
//! Serves the invite API and live session hosting in a single server.
//! Runs on BIND_ADDR (e.g. 0.0.0.0:8888).

#[tokio::main]
async fn main() {
    wb_core::log();
    wb_core::kys();
    wb_server::run().await.unwrap();
}
