use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// Handlers read it once per request and thread the value through the policy
/// and workflow calls, so a single request never observes two different "nows".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
