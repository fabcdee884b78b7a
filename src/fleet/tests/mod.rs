//! Tests for fleet commands, driven through the scripted compute double.

mod gpu;
mod list;

use std::time::Duration;

use crate::api::ZoneScope;
use crate::fleet::Fleet;
use crate::test_support::ScriptedCompute;

fn scope() -> ZoneScope {
    ZoneScope::new("proj-1", "zone-a")
}

/// Fleet with millisecond polling so wait scenarios stay fast.
fn fast_fleet(api: ScriptedCompute) -> Fleet<ScriptedCompute> {
    Fleet::new(api)
        .with_poll_interval(Duration::from_millis(1))
        .with_wait_timeout(Duration::from_millis(250))
}
