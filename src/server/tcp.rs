//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un thread por conexión. Cada conexión lleva un único request y se cierra
//! después de la respuesta.

use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, error, info, info_span, warn};

/// Tamaño máximo de la cabecera de un request
const MAX_REQUEST_BYTES: usize = 8192;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Servidor HTTP/1.0 concurrente
pub struct Server {
    router: Arc<Router>,
    listener: TcpListener,
}

impl Server {
    /// Hace bind en `address` (ej: "0.0.0.0:3001"). El puerto 0 elige uno libre.
    pub fn bind(address: &str, router: Router) -> io::Result<Self> {
        let listener = TcpListener::bind(address)?;
        Ok(Self {
            router: Arc::new(router),
            listener,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Acepta conexiones hasta que el proceso termina
    pub fn run(self) -> io::Result<()> {
        info!(address = %self.local_addr()?, "server listening (one thread per connection)");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let spawned = thread::Builder::new()
                        .name("conn".to_string())
                        .spawn(move || Self::handle_connection(stream, &router));

                    if let Err(e) = spawned {
                        error!(error = %e, "failed to spawn connection thread");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(mut stream: TcpStream, router: &Router) {
        let request_id = next_request_id();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let span = info_span!("request", id = %request_id, peer = %peer);
        let _enter = span.enter();

        if let Err(e) = Self::serve(&mut stream, router, &request_id) {
            debug!(error = %e, "connection error");
        }
    }

    fn serve(stream: &mut TcpStream, router: &Router, request_id: &str) -> io::Result<()> {
        let start = Instant::now();
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let buffer = read_head(stream)?;
        if buffer.is_empty() {
            debug!("connection closed without data");
            return Ok(());
        }

        let (mut response, method, path) = match Request::parse(&buffer) {
            Ok(request) => {
                let response = router.route(&request);
                (response, request.method().as_str(), request.path().to_string())
            }
            Err(e) => {
                debug!(error = %e, "malformed request");
                let response = Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e))
                    .with_header("Connection", "close");
                (response, "-", "-".to_string())
            }
        };

        response.add_header("X-Request-Id", request_id);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        info!(
            method,
            path = %path,
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "handled request"
        );

        Ok(())
    }
}

/// Lee hasta el fin de los headers (`\r\n\r\n`), EOF o `MAX_REQUEST_BYTES`
fn read_head(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    while buffer.len() < MAX_REQUEST_BYTES {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if buffer.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    buffer.truncate(MAX_REQUEST_BYTES);
    Ok(buffer)
}

/// Id corto y único por proceso para correlacionar logs y respuestas
fn next_request_id() -> String {
    let mut hasher = DefaultHasher::new();
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    std::process::id().hash(&mut hasher);
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Shutdown;

    fn start(router: Router) -> SocketAddr {
        let server = Server::bind("127.0.0.1:0", router).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());
        addr
    }

    fn send(addr: SocketAddr, raw: &[u8]) -> String {
        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn router() -> Router {
        let mut router = Router::new();
        router.register("/ping", |_req: &Request| Response::text(StatusCode::Ok, "pong"));
        router
    }

    #[test]
    fn test_handle_request_ok() {
        let addr = start(router());

        let text = send(addr, b"GET /ping HTTP/1.0\r\n\r\n");

        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("X-Request-Id:"));
        assert!(text.ends_with("\r\n\r\npong"));
    }

    #[test]
    fn test_parse_error_is_400() {
        let addr = start(router());

        let text = send(addr, b"\x00\x01\x02\x03garbage");

        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Invalid:"));
    }

    #[test]
    fn test_peer_closed_immediately() {
        let addr = start(router());

        drop(TcpStream::connect(addr).unwrap());

        // El servidor sigue atendiendo
        let text = send(addr, b"GET /ping HTTP/1.0\r\n\r\n");
        assert!(text.contains("200 OK"));
    }

    #[test]
    fn test_concurrent_connections() {
        let addr = start(router());

        let clients: Vec<_> = (0..8)
            .map(|_| thread::spawn(move || send(addr, b"GET /ping HTTP/1.0\r\n\r\n")))
            .collect();

        for client in clients {
            assert!(client.join().unwrap().contains("pong"));
        }
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = next_request_id();
        let b = next_request_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 16);
    }
}
