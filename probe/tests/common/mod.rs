#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

/// Builds a raw HTTP/1.1 response that closes the connection after the body.
pub fn canned(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut head = format!("HTTP/1.1 {status_line}\r\n");
    for (name, value) in headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str(&format!(
        "content-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    ));

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// Spawns a responder on `127.0.0.1:0` that answers every request with
/// `respond(path)`. Runs until the test runtime shuts down.
pub async fn spawn_responder<F>(respond: F) -> SocketAddr
where
    F: Fn(&str) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        while let Ok((mut stream, _addr)) = listener.accept().await {
            let respond = respond.clone();
            tokio::spawn(async move {
                let Some(path) = read_request_path(&mut stream).await else {
                    return;
                };
                log::debug!("responder: request path={path}");
                let _ = stream.write_all(&respond(&path)).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// Same canned bytes for every request.
pub async fn spawn_canned(response: Vec<u8>) -> SocketAddr {
    spawn_responder(move |_path| response.clone()).await
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0_u8; 1024];

    loop {
        let count = stream.read(&mut buf).await.ok()?;
        if count == 0 {
            return None;
        }
        head.extend_from_slice(&buf[..count]);
        if head.windows(4).any(|x| x == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&head);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(ToString::to_string)
}
