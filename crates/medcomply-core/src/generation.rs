//! Monotonic request generations.

use std::fmt;

/// Identifies one issued request cycle.
///
/// Each controller bumps its generation when it issues a request; a response
/// is applied only if it carries the controller's current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    /// Returns the generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Advances in place and returns the new value.
    pub const fn bump(&mut self) -> Self {
        *self = self.next();
        *self
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
