use crate::render_target::{
    RenderTarget, RenderTargetExtents, RenderTargetId, RenderTargetListener, RenderTargetRegistry,
};
use crate::{RenderDagError, RenderDagResult};
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// In-memory registry double for tests. Targets can be recreated on demand to
/// simulate a window resize, which replaces every instance and fans out the
/// change notification the way a real registry would.
pub struct TestRenderTargetSet {
    targets: RefCell<FnvHashMap<RenderTargetId, Rc<RenderTarget>>>,
    listeners: RefCell<Vec<Weak<dyn RenderTargetListener>>>,
    subscribe_count: Cell<usize>,
}

impl TestRenderTargetSet {
    pub fn new() -> Rc<Self> {
        Rc::new(TestRenderTargetSet {
            targets: Default::default(),
            listeners: Default::default(),
            subscribe_count: Cell::new(0),
        })
    }

    pub fn insert(
        &self,
        name: &str,
        width: u32,
        height: u32,
    ) -> RenderTargetId {
        let id = RenderTargetId::new(name);
        let target = Rc::new(RenderTarget::new(
            id.clone(),
            RenderTargetExtents { width, height },
        ));
        self.targets.borrow_mut().insert(id.clone(), target);
        id
    }

    /// Replaces every tracked target with a fresh instance of the given
    /// extents and notifies all live listeners, pruning dead ones.
    pub fn recreate_all(
        &self,
        width: u32,
        height: u32,
    ) {
        {
            let mut targets = self.targets.borrow_mut();
            for (id, target) in targets.iter_mut() {
                *target = Rc::new(RenderTarget::new(
                    id.clone(),
                    RenderTargetExtents { width, height },
                ));
            }
        }

        // Upgrade outside the listeners borrow so a callback can reach the
        // registry again
        let live: Vec<_> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners
                .iter()
                .filter_map(|listener| listener.upgrade())
                .collect()
        };
        for listener in live {
            listener.on_render_targets_changed();
        }
    }

    /// Total number of subscribe() calls ever made, for asserting that a node
    /// registers itself exactly once.
    pub fn subscribe_count(&self) -> usize {
        self.subscribe_count.get()
    }

    /// Listeners still registered (dead weak references excluded).
    pub fn live_listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count()
    }
}

impl RenderTargetRegistry for TestRenderTargetSet {
    fn render_target(
        &self,
        id: &RenderTargetId,
    ) -> RenderDagResult<Rc<RenderTarget>> {
        self.targets
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| RenderDagError::RenderTargetNotFound(id.clone()))
    }

    fn subscribe(
        &self,
        listener: Weak<dyn RenderTargetListener>,
    ) {
        self.subscribe_count.set(self.subscribe_count.get() + 1);
        self.listeners.borrow_mut().push(listener);
    }
}
