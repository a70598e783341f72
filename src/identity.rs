use uuid::Uuid;

/// Fallback identity lookups, consulted only when the caller supplies no
/// override.
pub trait IdentityProvider: Send + Sync {
    /// Identifier for a client that cannot be attributed to a known user.
    fn anonymous_user_id(&self) -> String;

    /// Token grouping the events of one visit.
    fn session_id(&self) -> String;
}

/// In-memory identity, generated once per client.
///
/// Both identifiers are fixed at construction, so every event of one client
/// carries the same values. Persisting them across restarts is the host's
/// concern.
#[derive(Clone, Debug)]
pub struct LocalIdentity {
    anonymous_id: Uuid,
    session_id: Uuid,
}

impl LocalIdentity {
    pub fn new() -> Self {
        Self {
            anonymous_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
        }
    }
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for LocalIdentity {
    fn anonymous_user_id(&self) -> String {
        self.anonymous_id.to_string()
    }

    fn session_id(&self) -> String {
        self.session_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_stable_per_client() {
        let identity = LocalIdentity::new();
        assert_eq!(identity.anonymous_user_id(), identity.anonymous_user_id());
        assert_eq!(identity.session_id(), identity.session_id());
    }

    #[test]
    fn identifiers_differ_between_clients() {
        let a = LocalIdentity::new();
        let b = LocalIdentity::new();
        assert_ne!(a.anonymous_user_id(), b.anonymous_user_id());
        assert_ne!(a.session_id(), b.session_id());
    }
}
