//! Member change broadcast
//!
//! Handlers publish a [`MemberEvent`] after every member mutation.
//! Consumers (the session gate, and any future push surface) subscribe
//! and react. Dropping a receiver unsubscribes it.

use dashmap::DashMap;
use serde::Serialize;
use shared::models::Member;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberEventKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberEvent {
    /// Monotonic per-process version
    pub version: u64,
    pub kind: MemberEventKind,
    pub member_id: i64,
    /// Current row; `None` for deletions
    pub member: Option<Member>,
}

/// Per-resource version counters, bumped on every publish
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<&'static str, u64>,
}

impl ResourceVersions {
    pub fn bump(&self, resource: &'static str) -> u64 {
        let mut entry = self.versions.entry(resource).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn current(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

pub struct MemberWatch {
    tx: broadcast::Sender<MemberEvent>,
    versions: ResourceVersions,
    sequence: AtomicU64,
}

impl MemberWatch {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            versions: ResourceVersions::default(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MemberEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, mut event: MemberEvent) {
        event.version = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.versions.bump("member");
        // No receivers is normal at startup.
        let _ = self.tx.send(event);
    }

    pub fn member_version(&self) -> u64 {
        self.versions.current("member")
    }
}

impl Default for MemberWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberEvent {
    pub fn created(member: Member) -> Self {
        Self {
            version: 0,
            kind: MemberEventKind::Created,
            member_id: member.id,
            member: Some(member),
        }
    }

    pub fn updated(member: Member) -> Self {
        Self {
            version: 0,
            kind: MemberEventKind::Updated,
            member_id: member.id,
            member: Some(member),
        }
    }

    pub fn deleted(member_id: i64) -> Self {
        Self {
            version: 0,
            kind: MemberEventKind::Deleted,
            member_id,
            member: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber_with_version() {
        let watch = MemberWatch::new();
        let mut rx = watch.subscribe();

        watch.publish(MemberEvent::deleted(7));
        let event = rx.recv().await.expect("event expected");
        assert_eq!(event.kind, MemberEventKind::Deleted);
        assert_eq!(event.member_id, 7);
        assert_eq!(event.version, 1);
        assert_eq!(watch.member_version(), 1);

        watch.publish(MemberEvent::deleted(8));
        let event = rx.recv().await.expect("event expected");
        assert_eq!(event.version, 2);
    }

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let watch = MemberWatch::new();
        watch.publish(MemberEvent::deleted(1));
        assert_eq!(watch.member_version(), 1);
    }
}
