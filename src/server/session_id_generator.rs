// Session IDs

use std::sync::atomic::{AtomicU64, Ordering};

/// Generator of session IDs, shared by the accept loop
///
/// IDs start at 1 and increase by one per session. They are only
/// used to tell sessions apart in the logs.
pub struct SessionIdGenerator {
    next_id: AtomicU64,
}

impl SessionIdGenerator {
    /// Creates new SessionIdGenerator
    pub fn new() -> SessionIdGenerator {
        SessionIdGenerator {
            next_id: AtomicU64::new(1),
        }
    }

    /// Takes the next ID
    pub fn generate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_ids_increase() {
        let generator = SessionIdGenerator::new();

        assert_eq!(generator.generate_id(), 1);
        assert_eq!(generator.generate_id(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_unique_across_tasks() {
        let generator = Arc::new(SessionIdGenerator::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                tokio::spawn(async move { (0..100).map(|_| generator.generate_id()).collect::<Vec<u64>>() })
            })
            .collect();

        let mut ids = Vec::new();

        for h in handles {
            ids.extend(h.await.unwrap());
        }

        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 800);
        assert_eq!(ids[0], 1);
        assert_eq!(ids[799], 800);
    }
}
