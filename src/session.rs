use serde::{Deserialize, Serialize};

pub const DEFAULT_DURATION_MINUTES: u32 = 3;
pub const DEFAULT_TOTAL_CYCLES: u32 = 0;

/// Persisted session settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// minutes per turn, at least 1
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// full rounds per session, 0 is unlimited
    #[serde(rename = "cycles")]
    pub total_cycles: u32,
}

impl SessionConfig {
    pub fn new(duration_minutes: u32, total_cycles: u32) -> Self {
        Self {
            duration_minutes,
            total_cycles,
        }
        .sanitized()
    }

    /// A zero duration is how an unset value looks on disk; fall back to
    /// the default rather than starting a countdown that expires at once.
    pub fn sanitized(self) -> Self {
        Self {
            duration_minutes: if self.duration_minutes == 0 {
                DEFAULT_DURATION_MINUTES
            } else {
                self.duration_minutes
            },
            total_cycles: self.total_cycles,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.total_cycles == 0
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_DURATION_MINUTES,
            total_cycles: DEFAULT_TOTAL_CYCLES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.duration_minutes, 3);
        assert_eq!(cfg.total_cycles, 0);
        assert!(cfg.is_unlimited());
    }

    #[test]
    fn test_zero_duration_falls_back_to_default() {
        assert_eq!(SessionConfig::new(0, 4), SessionConfig::new(3, 4));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&SessionConfig::new(5, 2)).unwrap();
        assert_eq!(json, r#"{"duration":5,"cycles":2}"#);
    }
}
