mod common;

use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Level;

#[tokio::test]
async fn test_server_startup_serves_health() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .try_init();

    let app = common::test_app().await;
    // port 0 lets the OS pick a free port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_task: JoinHandle<()> = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let health = client.get(format!("http://{addr}/health")).send().await;
    let health_body: Option<serde_json::Value> = match health {
        Ok(response) if response.status().is_success() => response.json().await.ok(),
        _ => None,
    };
    let stats: Option<serde_json::Value> = match client
        .get(format!("http://{addr}/api/dashboard-stats"))
        .send()
        .await
    {
        Ok(response) => response.json().await.ok(),
        Err(_) => None,
    };

    server_task.abort();

    let health_body = health_body.expect("server did not answer /health");
    assert_eq!(health_body["status"], "ok");
    let stats = stats.expect("server did not answer /api/dashboard-stats");
    assert_eq!(stats["total_companies"], common::CATALOG_SIZE as u64);
}
