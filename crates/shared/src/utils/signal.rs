use tokio::{
    io,
    signal::unix::{signal, SignalKind},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Cancels `cancellation_token` on the first SIGTERM, SIGINT, SIGHUP or SIGQUIT.
///
/// Handlers are installed before returning, so a signal delivered right after
/// this call is not lost.
pub fn cancel_on_shutdown_signal(
    cancellation_token: CancellationToken,
) -> io::Result<JoinHandle<()>> {
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut quit = signal(SignalKind::quit())?;

    Ok(tokio::spawn(async move {
        let received = tokio::select! {
            _ = terminate.recv() => "SIGTERM",
            _ = interrupt.recv() => "SIGINT",
            _ = hangup.recv() => "SIGHUP",
            _ = quit.recv() => "SIGQUIT",
            () = cancellation_token.cancelled() => return,
        };
        log::info!("Received {received}, shutting down");
        cancellation_token.cancel();
    }))
}
