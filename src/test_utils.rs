//! Helpers shared by tests that talk to HTTP servers.

use axum::Router;

/// Serve `router` on a random local port and return its base URL, e.g.
/// "http://127.0.0.1:12345".
///
/// The server runs until the test's runtime shuts down.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener.");
    let address = listener
        .local_addr()
        .expect("Could not get test listener address.");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed.");
    });

    format!("http://{address}")
}
