#[tokio::main]
async fn main() {
    orderdesk_observability::init();

    let services = match orderdesk_api::app::services::build_services().await {
        Ok(services) => services,
        Err(err) => {
            tracing::error!("failed to wire services: {err}");
            std::process::exit(1);
        }
    };

    let app = orderdesk_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
