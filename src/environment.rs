use std::time::{Duration, Instant};

/// Read-only ambient page state shared by all tracking calls.
///
/// The embedding shell captures this once per page view. Server-side call
/// sites have none, and the tracker skips their events.
pub trait Environment: Send + Sync {
    /// Path component of the current page URL.
    fn page_path(&self) -> String;

    /// Referrer of the current page, if any.
    fn referrer(&self) -> Option<String> {
        None
    }

    /// User agent of the client, if known.
    fn user_agent(&self) -> Option<String> {
        None
    }

    /// IANA time zone name of the client, if known.
    fn timezone(&self) -> Option<String> {
        None
    }

    /// Monotonic time since the page was loaded.
    fn elapsed(&self) -> Duration;
}

/// Page state captured by the embedding shell at page load.
#[derive(Clone, Debug)]
pub struct PageEnvironment {
    page_path: String,
    referrer: Option<String>,
    user_agent: Option<String>,
    timezone: Option<String>,
    loaded: Instant,
}

impl PageEnvironment {
    pub fn new(page_path: impl Into<String>) -> Self {
        Self {
            page_path: page_path.into(),
            referrer: None,
            user_agent: None,
            timezone: None,
            loaded: Instant::now(),
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

impl Environment for PageEnvironment {
    fn page_path(&self) -> String {
        self.page_path.clone()
    }

    fn referrer(&self) -> Option<String> {
        self.referrer.clone()
    }

    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn timezone(&self) -> Option<String> {
        self.timezone.clone()
    }

    fn elapsed(&self) -> Duration {
        self.loaded.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_fields_default_to_unknown() {
        let environment = PageEnvironment::new("/");
        assert_eq!(environment.page_path(), "/");
        assert!(environment.referrer().is_none());
        assert!(environment.user_agent().is_none());
        assert!(environment.timezone().is_none());
    }

    #[test]
    fn ambient_fields_can_be_supplied() {
        let environment = PageEnvironment::new("/checkout")
            .with_referrer("https://example.com/")
            .with_user_agent("test-agent")
            .with_timezone("Europe/Berlin");
        assert_eq!(environment.referrer().as_deref(), Some("https://example.com/"));
        assert_eq!(environment.user_agent().as_deref(), Some("test-agent"));
        assert_eq!(environment.timezone().as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn elapsed_never_runs_backwards() {
        let environment = PageEnvironment::new("/");
        let first = environment.elapsed();
        let second = environment.elapsed();
        assert!(second >= first);
    }
}
