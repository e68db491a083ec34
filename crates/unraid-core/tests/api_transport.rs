//! Transport error mapping of the HTTP client against local sockets.

use std::net::TcpListener;
use std::time::Duration;

use unraid_core::Error;
use unraid_core::api::{DockerApi, UnraidClient};

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Bind then drop to obtain a port with nothing listening.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = UnraidClient::with_timeout(
        &format!("http://127.0.0.1:{port}"),
        "key",
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client.list_containers().await.unwrap_err();

    assert!(matches!(err, Error::Network(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn silent_server_is_timeout_error() {
    // Accepted by the kernel backlog but never answered.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = UnraidClient::with_timeout(
        &format!("http://{addr}"),
        "key",
        Duration::from_secs(1),
    )
    .unwrap();

    let err = client.list_containers().await.unwrap_err();

    assert!(
        matches!(err, Error::Timeout { seconds: 1 }),
        "unexpected error: {err}"
    );
    drop(listener);
}

#[test]
fn client_targets_graphql_endpoint() {
    let client =
        UnraidClient::with_timeout("https://tower.local", "key", Duration::from_secs(5)).unwrap();

    assert_eq!(client.endpoint().as_str(), "https://tower.local/graphql");
}
