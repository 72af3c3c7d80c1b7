use dotenvy::dotenv;

use istudio::logging::init_tracing;
use istudio::metrics::{init_metrics, metrics_app, metrics_middleware};
use istudio::router::init_router;
use istudio::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let metrics_handle = init_metrics();

    let state = init_app_state().await;
    let app = init_router(state).layer(axum::middleware::from_fn(metrics_middleware));

    // Metrics are served on a separate port so the exporter is never
    // reachable through the public listener.
    if let Some(handle) = metrics_handle {
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind("0.0.0.0:9100")
                .await
                .expect("Failed to bind metrics listener");
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                tracing::error!(error = %e, "Metrics server terminated");
            }
        });
    }

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await.unwrap();
}
