//! Server lifecycle.

use std::future::Future;
use std::io;

use log::{info, warn};
use tokio::net::TcpListener;
use wtf_core::LookupService;

use crate::routes::build_router;

/// Serves on `listener` until Ctrl+C.
pub async fn serve(listener: TcpListener, lookup: LookupService) -> io::Result<()> {
    serve_with_shutdown(listener, lookup, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("event=server_stop module=rpc status=signal"),
            Err(err) => {
                warn!("event=server_signal module=rpc status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    })
    .await
}

/// Serves on `listener` until `shutdown` resolves.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    lookup: LookupService,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!("event=server_start module=rpc status=ok addr={addr}");

    axum::serve(listener, build_router(lookup))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("event=server_stop module=rpc status=ok addr={addr}");
    Ok(())
}
