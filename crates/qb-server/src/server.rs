//! The `tiny_http` transport: a listening socket shared by a fixed pool of
//! worker threads, each blocking on `recv()`.

use std::io::Read;
use std::sync::Arc;
use std::thread;

use tiny_http::{Header, Request, Response, Server};

use crate::error::ServerError;
use crate::routes::{App, Reply};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Bind `listen` and serve requests until the listener fails.
pub fn serve(app: Arc<App>, listen: &str, workers: usize) -> Result<(), ServerError> {
    let server = Server::http(listen).map_err(|e| ServerError::Bind {
        addr: listen.to_string(),
        reason: e.to_string(),
    })?;
    let server = Arc::new(server);
    tracing::info!(%listen, workers, "quotebook listening");

    let handles = (0..workers)
        .map(|id| {
            let server = Arc::clone(&server);
            let app = Arc::clone(&app);
            thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn(move || work(&server, &app))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("worker thread panicked");
        }
    }
    Ok(())
}

fn work(server: &Server, app: &App) {
    loop {
        match server.recv() {
            Ok(request) => respond(app, request),
            Err(error) => {
                tracing::error!(%error, "failed to receive request");
                return;
            }
        }
    }
}

fn respond(app: &App, mut request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let reply = match read_body(&mut request) {
        Ok(body) => app.handle(&method, &url, &body),
        Err(reply) => reply,
    };
    tracing::info!(%method, %url, status = reply.status, "handled request");

    if let Err(error) = request.respond(into_response(reply)) {
        tracing::warn!(%error, "failed to send response");
    }
}

fn read_body(request: &mut Request) -> Result<String, Reply> {
    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|error| {
            tracing::warn!(%error, "failed to read request body");
            Reply::text(400, "bad request")
        })?;

    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(Reply::text(413, "request body too large"));
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn into_response(reply: Reply) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    let headers = std::iter::once(("Content-Type", reply.content_type.to_string())).chain(reply.headers);
    for (name, value) in headers {
        match Header::from_bytes(name, value.as_bytes()) {
            Ok(header) => response.add_header(header),
            Err(()) => tracing::warn!(name, "dropped invalid response header"),
        }
    }
    response
}
