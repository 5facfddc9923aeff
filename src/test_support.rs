// Test helpers shared by module tests

use std::convert::Infallible;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Response;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

pub const SITE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>T</title>
    <meta name="description" content="D">
</head>
<body><h1>H</h1><h1>second</h1></body>
</html>"#;

/// Serve `body` with `status` on a throwaway local port, returning its base url
pub async fn serve_fixture(status: u16, body: &'static str) -> String {
    serve_delayed_fixture(Duration::ZERO, status, body).await
}

/// Like `serve_fixture`, but every response is held back for `delay`
pub async fn serve_delayed_fixture(delay: Duration, status: u16, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let service = service_fn(move |_req| async move {
                    tokio::time::sleep(delay).await;
                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .header("Content-Type", "text/html; charset=utf-8")
                            .body(Full::new(Bytes::from(body)))
                            .unwrap(),
                    )
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    format!("http://{addr}")
}

/// An address nothing listens on
pub async fn refused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
