//! Field id generation
//!
//! Ids are derived from wall-clock milliseconds. Two ids minted within the
//! same millisecond would collide, so every generator checks the ids already
//! in use and falls back to a random suffix.

use std::collections::HashSet;

/// Source of the current time in milliseconds
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Short random suffix taken from a v4 uuid
pub fn random_suffix() -> String {
    let uuid = uuid::Uuid::new_v4();
    uuid.simple().to_string()[..8].to_string()
}

/// Return `base` if unused, otherwise `base_<random>` until it is unused
pub fn ensure_unique(base: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&base) {
        return base;
    }
    loop {
        let candidate = format!("{}_{}", base, random_suffix());
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}

/// Id for a newly added field: `field_<millis>`
pub fn new_field_id(clock: &impl Clock, taken: &HashSet<String>) -> String {
    ensure_unique(format!("field_{}", clock.now_millis()), taken)
}

/// Id for a field copied out of a template: `<original>_<millis>`
pub fn template_field_id(original: &str, clock: &impl Clock, taken: &HashSet<String>) -> String {
    ensure_unique(format!("{}_{}", original, clock.now_millis()), taken)
}

/// Id for an imported field that arrived without one
///
/// Always carries a random component since malformed inputs tend to omit
/// many ids at once.
pub fn synthesize_field_id(clock: &impl Clock) -> String {
    format!("field_{}_{}", clock.now_millis(), random_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_id_uses_timestamp() {
        let taken = HashSet::new();
        assert_eq!(new_field_id(&FixedClock(1700), &taken), "field_1700");
    }

    #[test]
    fn test_same_millisecond_falls_back_to_suffix() {
        let mut taken = HashSet::new();
        taken.insert("field_1700".to_string());

        let id = new_field_id(&FixedClock(1700), &taken);
        assert_ne!(id, "field_1700");
        assert!(id.starts_with("field_1700_"));
        assert_eq!(id.len(), "field_1700_".len() + 8);
    }

    #[test]
    fn test_template_field_id() {
        let taken = HashSet::new();
        assert_eq!(
            template_field_id("email", &FixedClock(42), &taken),
            "email_42"
        );
    }

    #[test]
    fn test_synthesized_ids_differ() {
        let clock = FixedClock(5);
        assert_ne!(synthesize_field_id(&clock), synthesize_field_id(&clock));
    }
}
