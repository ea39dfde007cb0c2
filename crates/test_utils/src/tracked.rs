use crate::DropLog;
use tether_memory::{Downcast, RefCount, RefCounted, impl_downcast, impl_upcast};

/// A counted trait used for exercising trait object handles
pub trait Labelled: RefCounted + Downcast {
    /// Returns a description of the object
    fn label(&self) -> String;
}

impl_downcast!(Labelled);

/// A counted object that records its destruction in a [DropLog]
#[derive(Debug, RefCounted)]
pub struct Tracked {
    ref_count: RefCount,
    /// The id that gets recorded when the object is dropped
    pub id: u32,
    log: DropLog,
}

impl Tracked {
    /// Makes a new object with a count of zero
    pub fn new(id: u32, log: &DropLog) -> Self {
        Self {
            ref_count: RefCount::new(),
            id,
            log: log.clone(),
        }
    }

    /// Makes a new boxed object, as expected by the raw address APIs
    pub fn boxed(id: u32, log: &DropLog) -> Box<Self> {
        Box::new(Self::new(id, log))
    }

    /// Returns the object's current count
    pub fn count(&self) -> usize {
        self.ref_count().get()
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.record(self.id);
    }
}

impl Labelled for Tracked {
    fn label(&self) -> String {
        format!("Tracked({})", self.id)
    }
}

/// A counted object that embeds a [Tracked] base object and shares its count
#[derive(Debug, RefCounted)]
pub struct TrackedChild {
    #[ref_count]
    /// The embedded base object
    pub base: Tracked,
    /// Some extra data that isn't present in the base
    pub extra: String,
}

impl TrackedChild {
    /// Makes a new object with a count of zero
    pub fn new(id: u32, extra: &str, log: &DropLog) -> Self {
        Self {
            base: Tracked::new(id, log),
            extra: extra.into(),
        }
    }
}

impl Labelled for TrackedChild {
    fn label(&self) -> String {
        format!("TrackedChild({}, {})", self.base.id, self.extra)
    }
}

impl_upcast!(Tracked => dyn Labelled);
impl_upcast!(TrackedChild => dyn Labelled);
