use tessera_domain::session::SessionEvent;

/// Handle returned by [`SessionManager::add_listener`](crate::SessionManager::add_listener).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Observer of committed session changes.
///
/// Called synchronously on the task that performed the change, with no session lock held,
/// so a listener may read the session but must not block.
pub trait SessionListener: Send + Sync {
    fn on_session_change(&self, event: &SessionEvent);
}

impl<F> SessionListener for F
where
    F: Fn(&SessionEvent) + Send + Sync,
{
    fn on_session_change(&self, event: &SessionEvent) {
        self(event);
    }
}
