//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define dependencies this subsystem needs.

use shared_types::{PhotoId, StorageError, Subject, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Resolves a photo id to its recorded owner.
///
/// Implemented by the persistence collaborator. `Ok(None)` means no such photo.
#[async_trait::async_trait]
pub trait OwnerResolver: Send + Sync {
    async fn resolve_owner(&self, id: &PhotoId) -> Result<Option<Subject>, StorageError>;
}

#[async_trait::async_trait]
impl<R: OwnerResolver + ?Sized> OwnerResolver for Arc<R> {
    async fn resolve_owner(&self, id: &PhotoId) -> Result<Option<Subject>, StorageError> {
        (**self).resolve_owner(id).await
    }
}

/// Time source trait for testability.
///
/// The verifier never reads the wall clock itself.
pub trait TimeSource: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// System time implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            // Clock before Unix epoch - return 0 rather than panic
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: AtomicU64,
}

impl ManualTimeSource {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_time_source() {
        let clock = ManualTimeSource::new(100);
        assert_eq!(clock.now(), 100);
        clock.advance(5);
        assert_eq!(clock.now(), 105);
        clock.set(7);
        assert_eq!(clock.now(), 7);
    }

    #[test]
    fn test_system_time_is_after_2023() {
        assert!(SystemTimeSource.now() > 1_672_531_200);
    }

    #[test]
    fn test_arc_delegates() {
        let clock = Arc::new(ManualTimeSource::new(42));
        let shared: Arc<dyn TimeSource> = clock.clone();
        assert_eq!(shared.now(), 42);
        clock.advance(1);
        assert_eq!(shared.now(), 43);
    }
}
