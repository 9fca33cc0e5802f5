use crate::{
    error::{Error, Result},
    MAX_DEPTH,
};

/// Tracks how deeply arrays and objects are nested while walking a value, so that hostile input
/// can't exhaust the stack.
#[derive(Clone, Debug, Default)]
pub struct DepthTracker {
    depth: usize,
}

impl DepthTracker {
    /// Create a new depth tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Step into an array or object.
    pub fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        // Check to see if we hit the nesting limit
        if self.depth > MAX_DEPTH {
            self.depth -= 1;
            return Err(Error::ParseLimit("Depth limit exceeded".to_string()));
        }
        Ok(())
    }

    /// Step back out of an array or object.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
