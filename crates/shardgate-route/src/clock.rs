use time::{OffsetDateTime, PrimitiveDateTime};

///
/// Clock
///
/// Source of "now" for default routing and provisioning.
/// Sampled once per resolution pass through `RouteContext`.
///

pub trait Clock: Send + Sync {
    fn now(&self) -> PrimitiveDateTime;
}

///
/// SystemClock
///
/// Wall clock in the local offset, falling back to UTC when the local
/// offset cannot be determined safely.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());

        PrimitiveDateTime::new(now.date(), now.time())
    }
}

///
/// FixedClock
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedClock(pub PrimitiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> PrimitiveDateTime {
        self.0
    }
}
