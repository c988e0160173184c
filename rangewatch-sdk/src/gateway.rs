//! Collaborator interfaces the monitor drives.
//!
//! Every collaborator runs synchronously on the caller's stack, in the order
//! store, publish, notify.

use rangewatch_types::{PersistedState, Status};

use crate::error::StoreError;

/// Key-value persistence backend, keyed by namespace.
pub trait StateStore: Send + Sync {
    /// Write the record for `namespace`, replacing any previous one.
    fn store(&self, namespace: &str, record: &PersistedState) -> Result<(), StoreError>;

    /// Read the record for `namespace`, `None` if nothing was stored.
    fn load(&self, namespace: &str) -> Result<Option<PersistedState>, StoreError>;
}

/// A snapshot handed to a [`Publisher`].
///
/// The route is lent for the duration of the call and stays owned by the
/// monitor. The payload is moved into the transport, which may keep it or
/// drop it.
#[derive(Debug)]
pub struct Publication<'a> {
    /// Name of the publishing monitor.
    pub monitor: &'a str,
    pub route: &'a str,
    /// JSON snapshot.
    pub payload: String,
    /// Set for state-change publishes; unset for heartbeats.
    pub forced: bool,
}

/// Outbound transport for snapshots.
pub trait Publisher: Send {
    /// Returns whether the transport accepted the publication. The monitor
    /// does not retry.
    fn publish(&mut self, publication: Publication<'_>) -> bool;
}

impl<F> Publisher for F
where
    F: FnMut(Publication<'_>) -> bool + Send,
{
    fn publish(&mut self, publication: Publication<'_>) -> bool {
        self(publication)
    }
}

/// Arguments of a status notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notification<'a> {
    /// Name of the notifying monitor.
    pub monitor: &'a str,
    /// Status just entered.
    pub status: Status,
    /// Whether the user asked to be notified; a hint only.
    pub notify: bool,
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

/// Receiver of status transitions.
pub trait Notifier: Send {
    fn notify(&mut self, notification: &Notification<'_>);
}

impl<F> Notifier for F
where
    F: FnMut(&Notification<'_>) + Send,
{
    fn notify(&mut self, notification: &Notification<'_>) {
        self(notification)
    }
}

/// Builds publish routes from path segments.
///
/// `primary` selects the device's own topic tree, `local` the broker-local
/// one. Returns `None` if no route can be built.
pub trait RouteBuilder {
    fn build(&self, primary: bool, local: bool, segments: &[&str]) -> Option<String>;
}

impl<F> RouteBuilder for F
where
    F: Fn(bool, bool, &[&str]) -> Option<String>,
{
    fn build(&self, primary: bool, local: bool, segments: &[&str]) -> Option<String> {
        self(primary, local, segments)
    }
}

/// A publisher that forwards publications into a tokio channel.
///
/// Sends never block: a full or closed channel rejects the publication.
///
/// # Example
///
/// ```rust
/// use rangewatch_sdk::ChannelPublisher;
///
/// let (publisher, mut rx) = ChannelPublisher::channel(16);
///
/// // Later, receive publications
/// // while let Some(msg) = rx.recv().await {
/// //     println!("{} -> {}", msg.route, msg.payload);
/// // }
/// # let _ = (publisher, rx.try_recv());
/// ```
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    tx: tokio::sync::mpsc::Sender<PublishedMessage>,
}

/// Owned copy of a publication, as delivered by [`ChannelPublisher`].
#[cfg(feature = "tokio")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub monitor: String,
    pub route: String,
    pub payload: String,
    pub forced: bool,
}

#[cfg(feature = "tokio")]
impl ChannelPublisher {
    pub fn new(tx: tokio::sync::mpsc::Sender<PublishedMessage>) -> Self {
        Self { tx }
    }

    /// Create a publisher and the receiving end of its channel.
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<PublishedMessage>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Self { tx }, rx)
    }
}

#[cfg(feature = "tokio")]
impl Publisher for ChannelPublisher {
    fn publish(&mut self, publication: Publication<'_>) -> bool {
        let message = PublishedMessage {
            monitor: publication.monitor.to_string(),
            route: publication.route.to_string(),
            payload: publication.payload,
            forced: publication.forced,
        };
        self.tx.try_send(message).is_ok()
    }
}
