use axum::Router;
use futures::StreamExt;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Duration, timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};
use url::Url;

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Spawns the app on a random local port.
pub async fn spawn_server(app: Router) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// Connects to `/ws/{path}?token=...`.
pub async fn connect_ws(
    addr: &str,
    path: &str,
    token: &str,
) -> Result<
    (Socket, axum::http::Response<Option<Vec<u8>>>),
    tokio_tungstenite::tungstenite::Error,
> {
    let url = Url::parse(&format!("ws://{addr}/ws/{path}?token={token}")).unwrap();
    let req = url.to_string().into_client_request().unwrap();
    connect_async(req).await
}

/// Next JSON text frame, skipping control frames. Panics after two seconds.
pub async fn next_event(ws: &mut Socket) -> Value {
    loop {
        let frame = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}
