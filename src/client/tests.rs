use std::time::Duration;

use tokio::net::TcpListener;

use super::exchange;
use crate::config::HubSettings;
use crate::hub::Hub;
use crate::transport::serve;

#[tokio::test]
async fn test_exchange_receives_own_messages() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Hub::start(&HubSettings::default())));

    let outgoing = vec!["one".to_string(), "two".to_string()];
    let received = exchange(&format!("ws://{addr}"), &outgoing, Duration::from_millis(300))
        .await
        .unwrap();

    assert_eq!(received, outgoing);
}

#[tokio::test]
async fn test_exchange_reports_connection_failure() {
    // bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();

    let result = exchange(&format!("ws://{addr}"), &[], Duration::from_millis(50)).await;
    assert!(result.is_err());
}
