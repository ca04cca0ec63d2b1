use tag_load_core::prelude::ShutdownHandle;
use tokio::signal;

/// Turn Ctrl-C into a shutdown signal.
///
/// The listener task only runs while the runtime is driven, which the batch loop does for the
/// whole of every scenario.
pub(crate) fn start_shutdown_listener(
    runtime: &tokio::runtime::Runtime,
) -> anyhow::Result<ShutdownHandle> {
    let handle = ShutdownHandle::default();

    let listener_handle = handle.clone();
    runtime.spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Received shutdown signal, shutting down...");
                listener_handle.shutdown();
            }
            Err(e) => log::error!("Failed to listen for Ctrl-C: {e:?}"),
        }
    });

    Ok(handle)
}
