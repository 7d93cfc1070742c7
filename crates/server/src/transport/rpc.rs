//! tarpc transport for the ephemq server
//!
//! Frames are length-delimited JSON, matching
//! `tarpc::serde_transport::tcp::connect(addr, Json::default)` on the client.

use futures::prelude::*;
use std::net::SocketAddr;
use tarpc::server::{self, Channel};
use tarpc::tokio_serde::formats::Json;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::{debug, error, info};

use crate::handler::Handler;
use crate::protocol::EphemqService;

/// Run the tarpc RPC server until `shutdown` resolves.
///
/// Connections already accepted keep running until their clients hang up.
pub async fn run_server(
    listener: TcpListener,
    handler: Handler,
    mut shutdown: impl Future<Output = ()> + Unpin + Send + 'static,
) -> anyhow::Result<()> {
    info!("ephemq RPC server listening on {}", listener.local_addr()?);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    tokio::spawn(serve_connection(socket, peer, handler.clone()));
                }
                Err(e) => error!("Accept error: {}", e),
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping RPC server");
                break;
            }
        }
    }

    Ok(())
}

async fn serve_connection(socket: TcpStream, peer: SocketAddr, handler: Handler) {
    debug!("RPC connection from {}", peer);

    let framed = Framed::new(socket, LengthDelimitedCodec::new());
    let transport = tarpc::serde_transport::new(framed, Json::default());

    // One task per in-flight request.
    server::BaseChannel::with_defaults(transport)
        .execute(handler.serve())
        .for_each(|response| async move {
            tokio::spawn(response);
        })
        .await;

    debug!("RPC connection from {} closed", peer);
}
