//! Request tokens: how a page ignores responses it no longer wants.
//!
//! Every request a page starts gets a fresh [`RequestToken`]. Its result
//! comes back tagged with that token and is applied only if the token is
//! still the outstanding one. Starting a request for a different key, or
//! unmounting, makes older tokens stale.

/// Identifies one request of one page. Monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Tracks the single outstanding request of one resource on one page.
///
/// `K` says what is being fetched (a project id, or `()` for singletons):
/// asking again for the key already in flight is a duplicate and is
/// suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTracker<K = ()> {
    issued: u64,
    outstanding: Option<(RequestToken, K)>,
}

impl<K> Default for RequestTracker<K> {
    fn default() -> Self {
        Self {
            issued: 0,
            outstanding: None,
        }
    }
}

impl<K: PartialEq> RequestTracker<K> {
    /// Create a tracker with nothing outstanding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `key`.
    ///
    /// Returns `None` if a request for the same key is already outstanding.
    /// Otherwise the new token supersedes any outstanding one.
    pub fn begin(&mut self, key: K) -> Option<RequestToken> {
        if self.outstanding.as_ref().is_some_and(|(_, k)| *k == key) {
            return None;
        }
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.outstanding = Some((token, key));
        Some(token)
    }

    /// Accept the result of `token`.
    ///
    /// Returns `true` (and clears the outstanding request) only if `token`
    /// is the current one; a stale result returns `false`.
    pub fn finish(&mut self, token: RequestToken) -> bool {
        if self.is_current(token) {
            self.outstanding = None;
            true
        } else {
            tracing::debug!(token = token.get(), "Discarding stale response");
            false
        }
    }

    /// Whether `token` is the outstanding request.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.outstanding.as_ref().is_some_and(|(t, _)| *t == token)
    }

    /// Key of the outstanding request.
    #[must_use]
    pub fn outstanding_key(&self) -> Option<&K> {
        self.outstanding.as_ref().map(|(_, k)| k)
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Forget the outstanding request; its result will be ignored.
    pub fn abandon(&mut self) {
        self.outstanding = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn duplicate_key_is_suppressed() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(1).unwrap();
        assert_eq!(tracker.begin(1), None);
        assert!(tracker.is_current(first));
    }

    #[test]
    fn different_key_supersedes() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(1).unwrap();
        let second = tracker.begin(2).unwrap();

        assert!(!tracker.finish(first));
        assert!(tracker.is_outstanding());
        assert!(tracker.finish(second));
        assert!(!tracker.is_outstanding());
    }

    #[test]
    fn same_key_can_be_requested_again_after_finish() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(()).unwrap();
        assert!(tracker.finish(first));
        let second = tracker.begin(()).unwrap();
        assert!(second > first);
    }

    #[test]
    fn abandoned_result_is_stale() {
        let mut tracker = RequestTracker::new();
        let token = tracker.begin(()).unwrap();
        tracker.abandon();
        assert!(!tracker.finish(token));
    }

    proptest! {
        #[test]
        fn only_the_latest_token_is_accepted(keys in prop::collection::vec(0u8..4, 1..20)) {
            let mut tracker = RequestTracker::new();
            let mut tokens = Vec::new();
            for key in keys {
                if let Some(token) = tracker.begin(key) {
                    tokens.push(token);
                }
            }
            let last = *tokens.last().unwrap();
            for token in &tokens[..tokens.len() - 1] {
                prop_assert!(!tracker.is_current(*token));
            }
            prop_assert!(tracker.finish(last));
        }
    }
}
