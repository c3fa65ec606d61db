//! Realtime Control Client
//!
//! A mounted dashboard is a single tokio task that exclusively owns the
//! media list, the playback status and the one push-channel connection.
//! The [`DashboardHandle`] talks to it through a request queue and observes
//! it through a `watch` channel.
//!
//! Connection lifecycle:
//! `Connecting -> Connected -> (status events)* -> Disconnected`
//!
//! Teardown (closing the channel, state back to `Disconnected`) runs on
//! every exit path: explicit unmount, dropped handle, server close and
//! connect failure.

mod state;

pub use state::{
    ConnectionState, DashboardState, Notice, NoticeKind, TrackRow, COMMAND_FAILED_MESSAGE,
    MEDIA_FETCH_ERROR,
};

use crate::api::MediaLibrary;
use crate::channel::{Connector, PushChannel};
use futures::future::OptionFuture;
use mcc_common::events::{Command, CommandResponse, ServerEvent};
use mcc_common::models::{MediaItem, PlaybackStatus, TrackId};
use mcc_common::{Error, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Work queued by the handle for the dashboard task
#[derive(Debug)]
enum Request {
    Send(Command),
    Dismiss(u64),
}

pub struct Dashboard;

impl Dashboard {
    /// Mount a dashboard: fetch the media list and open the push channel.
    ///
    /// Both start immediately and independently; a listing failure does not
    /// prevent the connection and vice versa. Must be called from within a
    /// tokio runtime.
    pub fn mount<L, C>(library: L, connector: C) -> DashboardHandle
    where
        L: MediaLibrary + 'static,
        C: Connector + 'static,
    {
        let (state_tx, state_rx) = watch::channel(DashboardState::mounting());
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = DashboardTask {
            library,
            connector,
            state: state_tx,
            requests: request_rx,
            cancel: cancel.clone(),
        };

        info!("Mounting dashboard");
        let task = tokio::spawn(task.run());

        DashboardHandle {
            requests: request_tx,
            state: state_rx,
            cancel,
            task: Some(task),
        }
    }
}

/// Command triggers and state access for a mounted dashboard
///
/// Dropping the handle unmounts the dashboard.
pub struct DashboardHandle {
    requests: mpsc::UnboundedSender<Request>,
    state: watch::Receiver<DashboardState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DashboardHandle {
    pub fn play(&self, track_id: impl Into<TrackId>) {
        self.send(Request::Send(Command::Play {
            track_id: track_id.into(),
        }));
    }

    pub fn pause(&self) {
        self.send(Request::Send(Command::Pause));
    }

    pub fn stop(&self) {
        self.send(Request::Send(Command::Stop));
    }

    /// Sent only if a current track is known, otherwise a silent no-op
    pub fn skip(&self) {
        self.send(Request::Send(Command::Skip));
    }

    pub fn dismiss(&self, notice_id: u64) {
        self.send(Request::Dismiss(notice_id));
    }

    /// Snapshot of the current state
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    /// Wait until the state satisfies `predicate`.
    ///
    /// Returns `None` if the dashboard task ended first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&DashboardState) -> bool,
    ) -> Option<DashboardState> {
        let mut state = self.state.clone();
        let snapshot = state.wait_for(predicate).await.ok().map(|s| s.clone());
        snapshot
    }

    /// Close the push channel and wait for the dashboard task to finish
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "Dashboard task failed");
            }
        }
        info!("Dashboard unmounted");
    }

    fn send(&self, request: Request) {
        if self.requests.send(request).is_err() {
            debug!("Dashboard no longer running, request dropped");
        }
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct DashboardTask<L, C> {
    library: L,
    connector: C,
    state: watch::Sender<DashboardState>,
    requests: mpsc::UnboundedReceiver<Request>,
    cancel: CancellationToken,
}

impl<L: MediaLibrary, C: Connector> DashboardTask<L, C> {
    async fn run(self) {
        let DashboardTask {
            library,
            connector,
            state,
            mut requests,
            cancel,
        } = self;

        let mut listing = Some(library.list_media());
        let mut connecting = Some(connector.connect());
        let mut channel: Option<Box<dyn PushChannel>> = None;
        let mut next_notice_id: u64 = 1;

        loop {
            // Cancellation is checked first so nothing lands after unmount.
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("Dashboard unmount requested");
                    break;
                }

                Some(result) = OptionFuture::from(listing.as_mut()), if listing.is_some() => {
                    listing = None;
                    apply_listing(&state, result);
                }

                Some(result) = OptionFuture::from(connecting.as_mut()), if connecting.is_some() => {
                    connecting = None;
                    match result {
                        Ok(connected) => {
                            channel = Some(connected);
                            state.send_modify(|s| s.connection = ConnectionState::Connected);
                        }
                        Err(e) => {
                            warn!(error = %e, "connect_error: push channel unavailable");
                            state.send_modify(|s| s.connection = ConnectionState::Disconnected);
                        }
                    }
                }

                event = next_inbound(&mut channel) => match event {
                    Some(Ok(event)) => apply_event(&state, event, &mut next_notice_id),
                    Some(Err(Error::Protocol(reason))) => {
                        warn!(reason = %reason, "Ignoring undecodable push-channel frame");
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "disconnect: push channel failed");
                        close_channel(channel.take()).await;
                        state.send_modify(|s| s.connection = ConnectionState::Disconnected);
                    }
                    None => {
                        info!("disconnect: push channel closed by server");
                        channel = None;
                        state.send_modify(|s| s.connection = ConnectionState::Disconnected);
                    }
                },

                // Commands wait until the connect attempt has resolved.
                request = requests.recv(), if connecting.is_none() => match request {
                    Some(Request::Send(command)) => {
                        dispatch(&state, channel.as_deref_mut(), command).await;
                    }
                    Some(Request::Dismiss(id)) => {
                        state.send_modify(|s| s.notices.retain(|n| n.id != id));
                    }
                    None => {
                        debug!("Dashboard handle dropped");
                        break;
                    }
                },
            }
        }

        close_channel(channel.take()).await;
        state.send_modify(|s| {
            s.connection = ConnectionState::Disconnected;
            s.status = PlaybackStatus::default();
        });
        debug!("Dashboard task finished");
    }
}

async fn next_inbound(channel: &mut Option<Box<dyn PushChannel>>) -> Option<Result<ServerEvent>> {
    match channel.as_mut() {
        Some(channel) => channel.next_event().await,
        None => std::future::pending().await,
    }
}

async fn close_channel(channel: Option<Box<dyn PushChannel>>) {
    if let Some(mut channel) = channel {
        match channel.close().await {
            Ok(()) => debug!("Push channel closed"),
            Err(e) => debug!(error = %e, "Push channel close failed"),
        }
    }
}

fn apply_listing(state: &watch::Sender<DashboardState>, result: Result<Vec<MediaItem>>) {
    match result {
        Ok(media) => {
            info!(count = media.len(), "Media list loaded");
            state.send_modify(|s| {
                s.media = media;
                s.error = None;
            });
        }
        Err(e) => {
            error!(error = %e, "Media fetch error");
            state.send_modify(|s| s.error = Some(MEDIA_FETCH_ERROR.to_string()));
        }
    }
}

fn apply_event(state: &watch::Sender<DashboardState>, event: ServerEvent, next_notice_id: &mut u64) {
    match event {
        ServerEvent::StatusUpdate(status) => {
            debug!(
                status = %status.status,
                track = ?status.current_track.as_ref().map(|t| &t.id),
                "status_update"
            );
            state.send_modify(|s| s.status = status);
        }
        ServerEvent::CommandResponse(response) => apply_command_response(state, response, next_notice_id),
        ServerEvent::Unknown { event } => debug!(event = %event, "Ignoring unknown push-channel event"),
    }
}

fn apply_command_response(
    state: &watch::Sender<DashboardState>,
    response: CommandResponse,
    next_notice_id: &mut u64,
) {
    if !response.is_error() {
        debug!(status = %response.status, message = ?response.message, "command_response");
        return;
    }

    let message = response
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| COMMAND_FAILED_MESSAGE.to_string());
    warn!(message = %message, "Command rejected by media service");

    let notice = Notice {
        id: *next_notice_id,
        kind: NoticeKind::CommandFailed,
        message,
    };
    *next_notice_id += 1;
    state.send_modify(|s| s.notices.push(notice));
}

async fn dispatch(
    state: &watch::Sender<DashboardState>,
    channel: Option<&mut (dyn PushChannel + 'static)>,
    command: Command,
) {
    if command == Command::Skip {
        let has_track = state.borrow().status.current_track.is_some();
        if !has_track {
            debug!("skip ignored: no current track");
            return;
        }
    }

    let Some(channel) = channel else {
        debug!(command = command.name(), "No push channel, command dropped");
        return;
    };

    if let Err(e) = channel.emit(&command).await {
        warn!(command = command.name(), error = %e, "Failed to emit command");
    }
}
