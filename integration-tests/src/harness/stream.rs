use arcwatch_core::event::{EnrichedEvent, ViewerMessage};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A test viewer attached to the stream endpoint.
pub struct ViewerStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ViewerStream {
    pub async fn connect(url: &str) -> Self {
        let (socket, _) = connect_async(url).await.expect("ws connect failed");
        Self { socket }
    }

    /// Next decoded message; control frames are skipped. `None` once closed.
    pub async fn next(&mut self) -> Option<ViewerMessage> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.socket.next())
                .await
                .expect("timed out waiting for a viewer message")?;

            match msg.expect("ws error") {
                Message::Text(text) => {
                    return Some(ViewerMessage::decode(&text).expect("undecodable viewer message"));
                }
                Message::Close(_) => return None,
                _ => {}
            }
        }
    }

    pub async fn expect_init(&mut self) -> Vec<EnrichedEvent> {
        match self.next().await {
            Some(ViewerMessage::Init(events)) => events,
            other => panic!("expected init batch, got {other:?}"),
        }
    }

    pub async fn expect_event(&mut self) -> EnrichedEvent {
        match self.next().await {
            Some(ViewerMessage::Event(event)) => event,
            other => panic!("expected live event, got {other:?}"),
        }
    }
}
