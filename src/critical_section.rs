//! Debug-only exclusive section for table operations.
//!
//! Every `ProbeTable` operation runs inside one section. Oracles and
//! `K: Eq` run while a section is open; if one of them reaches back into
//! the same table (through a raw pointer or interior mutability) the nested
//! entry panics in debug builds, naming both operations. Release builds
//! carry no state and the guard is a no-op.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct CriticalSection {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Cell<()> keeps the owning table Send but !Sync.
    _nosync: PhantomData<Cell<()>>,
}

impl CriticalSection {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosync: PhantomData,
        }
    }

    /// Open the section for operation `op`; it closes when the guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> SectionGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("`{op}` entered while `{outer}` is still probing the same table");
            }
            self.active.set(Some(op));
            return SectionGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return SectionGuard { _owner: PhantomData };
        }
    }
}

pub(crate) struct SectionGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a CriticalSection,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a CriticalSection>,
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
