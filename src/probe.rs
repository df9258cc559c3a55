// Unit-of-work implementations: TCP connect round trip and UDP payload
// send. The Probe trait is the seam for external packet backends.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::{TcpStream, UdpSocket};

/// One outbound unit of work. `true` means the unit succeeded; a failed
/// unit carries no diagnostics the pipeline acts on.
#[allow(async_fn_in_trait)]
pub trait Probe: Send + Sync {
    async fn attempt(&self) -> bool;

    /// Issue `n` units as one bulk operation, returning the success
    /// count. The caller times the whole call as a single span.
    async fn attempt_batch(&self, n: u32) -> u32 {
        let mut succeeded = 0;
        for _ in 0..n {
            if self.attempt().await {
                succeeded += 1;
            }
        }
        succeeded
    }
}

/// Round-trip probe: TCP connect with a bounded timeout. The connection
/// is closed as soon as it is established.
pub struct TcpConnectProbe {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpConnectProbe {
    pub fn new(addr: SocketAddr, timeout: Duration) -> Self {
        Self { addr, timeout }
    }
}

impl Probe for TcpConnectProbe {
    async fn attempt(&self) -> bool {
        matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(self.addr)).await,
            Ok(Ok(_))
        )
    }
}

/// One-way probe: sends a fixed payload datagram to the target.
pub struct DatagramSender {
    socket: UdpSocket,
    target: SocketAddr,
    payload: Bytes,
}

impl DatagramSender {
    /// Binds an ephemeral local socket. The same payload is sent on
    /// every unit.
    pub async fn bind(target: SocketAddr, payload_bytes: usize) -> std::io::Result<Self> {
        let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr).await?;
        Ok(Self {
            socket,
            target,
            payload: Bytes::from(vec![b'A'; payload_bytes]),
        })
    }
}

impl Probe for DatagramSender {
    async fn attempt(&self) -> bool {
        self.socket.send_to(&self.payload, self.target).await.is_ok()
    }
}
