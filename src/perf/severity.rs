use std::fmt;

/// FPS at or above this is [`Severity::Good`].
pub const GOOD_FPS: u32 = 55;
/// FPS at or above this (and below [`GOOD_FPS`]) is [`Severity::Warning`].
pub const WARNING_FPS: u32 = 30;

/// Color bucket for an FPS reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Good,
    Warning,
    Critical,
}

impl Severity {
    pub fn from_fps(fps: u32) -> Self {
        if fps >= GOOD_FPS {
            Self::Good
        } else if fps >= WARNING_FPS {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    /// Readout color as `0xRRGGBB`.
    pub fn color(self) -> u32 {
        match self {
            Self::Good => 0x4ade80,
            Self::Warning => 0xfacc15,
            Self::Critical => 0xf87171,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(Severity::from_fps(55), Severity::Good);
        assert_eq!(Severity::from_fps(54), Severity::Warning);
        assert_eq!(Severity::from_fps(30), Severity::Warning);
        assert_eq!(Severity::from_fps(29), Severity::Critical);
        assert_eq!(Severity::from_fps(0), Severity::Critical);
        assert_eq!(Severity::from_fps(u32::MAX), Severity::Good);
    }

    #[test]
    fn test_partition_is_monotonic() {
        // Walking up from 0 the bucket only ever improves, once per boundary.
        let mut changes = 0;
        let mut previous = Severity::from_fps(0);
        for fps in 1..=240 {
            let current = Severity::from_fps(fps);
            if current != previous {
                changes += 1;
                assert!(fps == WARNING_FPS || fps == GOOD_FPS, "changed at {fps}");
            }
            previous = current;
        }
        assert_eq!(changes, 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Good.to_string(), "good");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::from_fps(12).to_string(), "critical");
    }
}
