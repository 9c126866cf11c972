//! Step counter for multi-item operations.

/// Progress through a sequence of steps (e.g. files uploaded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Completed steps
    pub current: u32,
    /// Total steps
    pub total: u32,
}

impl Progress {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    /// Get progress as percentage (0-100)
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            ((self.current.min(self.total) as f64 / self.total as f64) * 100.0) as u8
        }
    }

    /// Get progress as fraction string (e.g., "3/5")
    pub fn as_fraction(&self) -> String {
        format!("{}/{}", self.current, self.total)
    }

    /// Check if progress is complete
    pub fn is_complete(&self) -> bool {
        self.current >= self.total && self.total > 0
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(Progress::new(0, 0).percentage(), 0);
        assert_eq!(Progress::new(1, 4).percentage(), 25);
        assert_eq!(Progress::new(4, 4).percentage(), 100);
        assert_eq!(Progress::new(9, 4).percentage(), 100);
    }

    #[test]
    fn test_fraction_and_completion() {
        let p = Progress::new(2, 3);
        assert_eq!(p.as_fraction(), "2/3");
        assert!(!p.is_complete());
        assert_eq!(p.remaining(), 1);
        assert!(Progress::new(3, 3).is_complete());
        assert!(!Progress::new(0, 0).is_complete());
    }
}
