use parking_lot::Mutex;
use std::sync::Arc;

/// Records the ids of destroyed objects, in the order that they were destroyed
///
/// Clones share the same record.
#[derive(Clone, Debug, Default)]
pub struct DropLog(Arc<Mutex<Vec<u32>>>);

impl DropLog {
    /// Makes a new empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the destruction of the object with the given id
    pub fn record(&self, id: u32) {
        self.0.lock().push(id);
    }

    /// Returns the number of recorded destructions
    pub fn count(&self) -> usize {
        self.0.lock().len()
    }

    /// Returns the number of times the object with the given id was destroyed
    pub fn times_destroyed(&self, id: u32) -> usize {
        self.0.lock().iter().filter(|&&x| x == id).count()
    }

    /// Returns a copy of the recorded ids
    pub fn ids(&self) -> Vec<u32> {
        self.0.lock().clone()
    }
}
