//! TCP stand-in for the host serial line
//!
//! One host at a time, like the point-to-point UART it replaces. Every byte
//! read from the socket goes straight into the [`ProtocolReceiver`], which
//! makes this task the receive interrupt. Response frames produced by the
//! scanner arrive on a channel and are written out in order; with no host
//! connected they are dropped, as a UART transmits into an open line.

use std::net::SocketAddr;
use std::sync::Arc;

use sensorboard_core::{ProtocolReceiver, SharedLink};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_graceful_shutdown::SubsystemHandle;

use crate::error::ServerError;

pub struct HostLink {
    listen: SocketAddr,
    link: Arc<SharedLink>,
    outbound: mpsc::Receiver<Vec<u8>>,
}

impl HostLink {
    pub fn new(listen: SocketAddr, link: Arc<SharedLink>, outbound: mpsc::Receiver<Vec<u8>>) -> Self {
        HostLink {
            listen,
            link,
            outbound,
        }
    }

    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.listen)
            .await
            .map_err(|e| ServerError::Bind(self.listen.to_string(), e))?;
        self.serve(listener, subsys).await
    }

    /// Accept hosts on an already bound listener until shutdown
    pub async fn serve(
        mut self,
        listener: TcpListener,
        subsys: SubsystemHandle,
    ) -> Result<(), ServerError> {
        log::info!("Host link listening on {}", listener.local_addr()?);

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::debug!("host link: shutdown");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = accepted?;
                    log::info!("Host connected from {}", peer);
                    match self.connection_loop(stream, &subsys).await {
                        Err(ServerError::Shutdown) => return Ok(()),
                        Err(e) => log::warn!("Host {}: {}", peer, e),
                        Ok(()) => log::info!("Host {} disconnected", peer),
                    }
                }
                frame = self.outbound.recv() => {
                    match frame {
                        Some(frame) => log::trace!("no host, dropped {:02X?}", frame),
                        None => return Ok(()),
                    }
                }
            }
        }
    }

    async fn connection_loop(
        &mut self,
        mut stream: TcpStream,
        subsys: &SubsystemHandle,
    ) -> Result<(), ServerError> {
        let mut receiver = ProtocolReceiver::new(self.link.clone());
        let mut buf = [0u8; 256];

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    return Err(ServerError::Shutdown);
                }
                read = stream.read(&mut buf) => {
                    let len = read?;
                    if len == 0 {
                        return Ok(());
                    }
                    log::trace!("received {:02X?}", &buf[..len]);
                    for &b in &buf[..len] {
                        receiver.on_byte(b);
                    }
                }
                frame = self.outbound.recv() => {
                    let Some(frame) = frame else {
                        return Err(ServerError::Shutdown);
                    };
                    stream.write_all(&frame).await?;
                }
            }
        }
    }
}
