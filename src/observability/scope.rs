//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` with `elapsed_ms` on `complete()`
//! - Logs `{name}_FAILED` on `fail()`
//! - Logs `{name}_INCOMPLETE` if dropped without either

use std::time::Instant;

use super::logger::Logger;

/// A scope that logs the begin and end of one unit of work
///
/// ```ignore
/// let scope = ObservationScope::with_fields("DOMAIN_LOAD", &[("path", "brakes.json")]);
/// match load() {
///     Ok(_) => scope.complete(),
///     Err(e) => scope.fail_fatal(&e.to_string()),
/// }
/// ```
pub struct ObservationScope {
    name: String,
    fields: Vec<(String, String)>,
    timer: Timer,
    finished: bool,
}

impl ObservationScope {
    /// Logs `{name}_BEGIN` immediately.
    pub fn new(name: &str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a scope whose fields are repeated on every line it logs
    pub fn with_fields(name: &str, fields: &[(&str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);
        Self {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timer: Timer::new(),
            finished: false,
        }
    }

    fn fields_with(&self, extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut all = self.fields.clone();
        all.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        all
    }

    fn emit(&mut self, suffix: &str, fields: Vec<(String, String)>, level: fn(&str, &[(&str, &str)])) {
        self.finished = true;
        let refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        level(&format!("{}_{}", self.name, suffix), &refs);
    }

    /// Logs `{name}_COMPLETE` at INFO level.
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        let elapsed = self.timer.elapsed_ms();
        let mut fields = self.fields_with(extra);
        fields.push(("elapsed_ms".to_string(), elapsed));
        self.emit("COMPLETE", fields, Logger::info);
    }

    /// Logs `{name}_FAILED` at ERROR level.
    pub fn fail(mut self, reason: &str) {
        let fields = self.fields_with(&[("reason", reason)]);
        self.emit("FAILED", fields, Logger::error);
    }

    /// Logs `{name}_FAILED` at FATAL level.
    pub fn fail_fatal(mut self, reason: &str) {
        let fields = self.fields_with(&[("reason", reason)]);
        self.emit("FAILED", fields, Logger::fatal);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            let fields = self.fields_with(&[("reason", "scope dropped without completion")]);
            let refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            Logger::warn(&format!("{}_INCOMPLETE", self.name), &refs);
        }
    }
}

/// A simple duration timer for logging elapsed time
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_creation() {
        let scope = ObservationScope::new("TEST");
        assert!(!scope.is_finished());
    }

    #[test]
    fn test_scope_complete() {
        ObservationScope::new("TEST").complete();
    }

    #[test]
    fn test_scope_with_fields() {
        let scope = ObservationScope::with_fields("DOMAIN_LOAD", &[("domain", "brakes")]);
        scope.complete_with_fields(&[("rules", "21")]);
    }

    #[test]
    fn test_scope_fail() {
        ObservationScope::new("TEST").fail("something went wrong");
    }

    #[test]
    fn test_scope_fail_fatal() {
        ObservationScope::new("TEST").fail_fatal("bad configuration");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ms: u64 = timer.elapsed_ms().parse().unwrap();
        assert!(ms >= 10);
    }
}
