//! Fake server for behavioural tests.
//!
//! Accepts a single connection, records the request envelope, writes a
//! canned reply and half-closes the socket. When no client connects before
//! the deadline the thread exits cleanly so tests where the CLI aborts
//! early do not hang.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

pub(in crate::tests) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeServer {
    /// Spawns a fake server listening on an ephemeral TCP port.
    pub fn spawn(reply: Vec<u8>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        listener
            .set_nonblocking(true)
            .context("fake server nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let requests_clone = Arc::clone(&requests);
        let handle = thread::spawn(move || Self::serve_client(&listener, &reply, &requests_clone));
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread and returns the recorded requests.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?
                .context("fake server failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        reply: &[u8],
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => return Self::answer(stream, reply, requests),
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn answer(
        mut stream: TcpStream,
        reply: &[u8],
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        stream
            .set_nonblocking(false)
            .context("blocking client stream")?;
        let request = read_request(&mut stream).context("read request")?;
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(request);
        stream.write_all(reply).context("write reply")?;
        stream.flush().context("flush reply")?;
        stream.shutdown(Shutdown::Write).context("half-close")?;
        Ok(())
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Reads until the accumulated bytes form one JSON document.
fn read_request(stream: &mut TcpStream) -> Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let count = stream.read(&mut chunk)?;
        if count == 0 {
            return Err(anyhow!("client closed before sending a full request"));
        }
        buffer.extend_from_slice(&chunk[..count]);
        let trimmed = buffer.trim_ascii();
        if serde_json::from_slice::<serde_json::Value>(trimmed).is_ok() {
            return String::from_utf8(trimmed.to_vec()).context("request utf8");
        }
    }
}
