use std::collections::HashMap;

use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::TcpListener,
};

/// Canned response served for a request path
#[derive(Clone, Debug)]
pub struct Canned {
  pub status: u16,
  pub body: String,
}

impl Canned {
  pub fn ok(body: &str) -> Self {
    Canned {
      status: 200,
      body: body.to_string(),
    }
  }

  pub fn status(status: u16) -> Self {
    Canned {
      status,
      body: String::new(),
    }
  }
}

/// Starts a minimal HTTP/1.1 server on a random local port and returns its base URL
///
/// Paths without a canned response get a 404. Each connection serves a single
/// request and is then closed
pub async fn serve(routes: Vec<(&str, Canned)>) -> String {
  let routes: HashMap<String, Canned> = routes.into_iter().map(|(path, canned)| (path.to_string(), canned)).collect();
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  tokio::spawn(async move {
    loop {
      let Ok((mut stream, _)) = listener.accept().await else {
        break;
      };

      let mut request = Vec::new();
      let mut buf = [0u8; 1024];
      while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
          Ok(0) | Err(_) => break,
          Ok(n) => request.extend_from_slice(&buf[..n]),
        }
      }

      let request = String::from_utf8_lossy(&request);
      let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
      let canned = routes.get(&path).cloned().unwrap_or_else(|| Canned::status(404));

      let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        canned.status,
        canned.body.len(),
        canned.body
      );
      let _ = stream.write_all(response.as_bytes()).await;
      let _ = stream.shutdown().await;
    }
  });

  format!("http://{addr}/api")
}
