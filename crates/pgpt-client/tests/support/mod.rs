//! Fake server used by the exchange tests.
//!
//! The server accepts one connection, reads until a complete JSON envelope
//! has arrived, records it, writes a canned reply and then either closes its
//! side or holds the connection open until the client hangs up.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// What the server does after writing its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterReply {
    /// Half-close the connection so the client observes end-of-stream.
    Close,
    /// Keep the connection open until the client closes it.
    Hold,
}

pub struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<Value>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeServer {
    pub fn spawn(reply: Vec<u8>, after: AfterReply) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let requests_clone = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().context("accept connection")?;
            Self::serve(stream, &reply, after, &requests_clone)
        });
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread and returns the recorded envelopes.
    pub fn finish(mut self) -> Result<Vec<Value>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))??;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve(
        mut stream: TcpStream,
        reply: &[u8],
        after: AfterReply,
        requests: &Arc<Mutex<Vec<Value>>>,
    ) -> Result<()> {
        let envelope = read_envelope(&mut stream).context("read envelope")?;
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(envelope);
        stream.write_all(reply).context("write reply")?;
        stream.flush().context("flush reply")?;
        match after {
            AfterReply::Close => stream.shutdown(Shutdown::Write).context("half-close")?,
            AfterReply::Hold => drain_until_closed(&mut stream).context("wait for client")?,
        }
        Ok(())
    }
}

/// Reads until the accumulated bytes parse as one JSON value.
fn read_envelope(stream: &mut TcpStream) -> Result<Value> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let count = stream.read(&mut chunk)?;
        if count == 0 {
            return Err(anyhow!("client closed before sending a full envelope"));
        }
        buffer.extend_from_slice(&chunk[..count]);
        if let Ok(value) = serde_json::from_slice::<Value>(buffer.trim_ascii()) {
            return Ok(value);
        }
    }
}

fn drain_until_closed(stream: &mut TcpStream) -> io::Result<()> {
    let mut sink = [0_u8; 256];
    while stream.read(&mut sink)? != 0 {}
    Ok(())
}
