//! # HTTP transport for image downloads
//!
//! [`ImageTransport`] is the seam between the guard and the network. The guard
//! hands it a URL that already passed validation together with the socket
//! addresses that were checked, and gets back the status, the `Content-Type`
//! header and a body stream it reads chunk by chunk.
//!
//! [`HttpTransport`] is the `reqwest` implementation. It pins the host to the
//! validated addresses, so the connection cannot be steered elsewhere by a
//! second DNS answer or an environment proxy, and it does not follow redirects.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use url::Url;

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Response body, yielded as it arrives.
pub type BodyStream = BoxStream<'static, Result<Bytes, TransportError>>;

pub struct ImageResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: BodyStream,
}

pub trait ImageTransport {
    /// Issue one GET for `url`, connecting only to `addrs`.
    fn get(
        &self,
        url: &Url,
        addrs: &[SocketAddr],
    ) -> impl Future<Output = Result<ImageResponse, TransportError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    user_agent: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

impl ImageTransport for HttpTransport {
    async fn get(&self, url: &Url, addrs: &[SocketAddr]) -> Result<ImageResponse, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy();
        if let Some(domain) = url.domain() {
            builder = builder.resolve_to_addrs(domain, addrs);
        }
        let client = builder.build()?;

        let response = client.get(url.clone()).send().await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Ok(ImageResponse {
            status: response.status().as_u16(),
            content_type,
            body: response
                .bytes_stream()
                .map_err(|e| Box::new(e) as TransportError)
                .boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::profile_image::USER_AGENT;

    /// Accept one connection, answer with `response`, and return the request head.
    async fn serve_once(listener: TcpListener, response: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&head).to_lowercase()
    }

    #[tokio::test]
    async fn test_connects_to_pinned_address_without_following_redirects() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 302 Found\r\n\
             Location: http://127.0.0.1:9/elsewhere.png\r\n\
             Content-Length: 0\r\n\
             Connection: close\r\n\r\n",
        ));

        // `.invalid` never resolves, so reaching the listener proves the pin was used.
        let url = Url::parse(&format!("http://pinned.invalid:{}/avatar.png", addr.port())).unwrap();
        let transport = HttpTransport::new(USER_AGENT, Duration::from_secs(5));
        let response = transport.get(&url, &[addr]).await.unwrap();

        assert_eq!(response.status, 302);

        let head = server.await.unwrap();
        assert!(head.starts_with("get /avatar.png http/1.1"), "{head}");
        assert!(head.contains(&format!("host: pinned.invalid:{}", addr.port())), "{head}");
        assert!(
            head.contains(&format!("user-agent: {}", USER_AGENT.to_lowercase())),
            "{head}"
        );
    }

    #[tokio::test]
    async fn test_streams_body_and_content_type() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 200 OK\r\n\
             Content-Type: image/gif\r\n\
             Content-Length: 6\r\n\
             Connection: close\r\n\r\n\
             GIF89a",
        ));

        let url = Url::parse(&format!("http://pinned.invalid:{}/a.gif", addr.port())).unwrap();
        let transport = HttpTransport::new(USER_AGENT, Duration::from_secs(5));
        let response = transport.get(&url, &[addr]).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("image/gif"));
        let body: Vec<Bytes> = response.body.try_collect().await.unwrap();
        assert_eq!(body.concat(), b"GIF89a");
        server.await.unwrap();
    }
}
