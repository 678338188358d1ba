use time::OffsetDateTime;

/// Millisecond wall clock shared by token issuance, expiry and credential stamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_in_millis() {
        let now = SystemClock.now_millis();
        // Sometime after 2020-01-01 in milliseconds.
        assert!(now > 1_577_836_800_000);
    }
}
