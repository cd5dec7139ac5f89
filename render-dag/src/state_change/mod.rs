use crate::pipeline_task::RenderPipelineTask;
use crate::RenderDagResult;
use downcast_rs::{impl_downcast, Downcast};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

mod set_render_buffer_mask;
pub use set_render_buffer_mask::SetRenderBufferMask;

mod set_blend_mode;
pub use set_blend_mode::SetBlendMode;

pub use set_scissor_test::SetScissorTest;


/// A comparable, lazily-materialized description of one piece of pipeline
/// state.
///
/// The frame-graph builder creates a fresh node per desired configuration per
/// build; the dedup layer then decides by *value equality* whether an equal
/// node is already active. Only nodes that survive into the active
/// configuration ever materialize a task. A node's lifecycle:
///
/// * constructed - identity fields stored verbatim, no registry access
/// * task ready - first `generate_task` call resolved the render target,
///   built the task, and subscribed the node for recreation notifications
/// * the node stays in that state across any number of target recreations,
///   which only swap the task's resource reference in place
///
/// State changes also implement [`crate::RenderTargetListener`] when they
/// reference a registry-owned resource, so a recreated target (window resize)
/// reaches the cached task without rebuilding the node or the graph.
pub trait StateChange: Downcast + fmt::Display {
    /// Returns the task that applies this state change, creating and caching
    /// it on first call. At most one task is ever created per node, and the
    /// registry subscription happens exactly when the task is created - never
    /// at construction, so nodes that are built but never scheduled leave no
    /// listener behind.
    fn generate_task(self: Rc<Self>) -> RenderDagResult<Rc<dyn RenderPipelineTask>>;

    /// The canonical neutral configuration for the same resource. The dedup
    /// layer emits this node's task to revert state when the originating node
    /// drops out of the active configuration. Memoized; a default instance
    /// returns itself.
    fn default_instance(self: Rc<Self>) -> Rc<dyn StateChange>;

    /// Structural equality over the resource id and value fields only. The
    /// cached task and cached default instance never participate, and nodes of
    /// different kinds always compare unequal.
    fn state_eq(
        &self,
        other: &dyn StateChange,
    ) -> bool;

    /// Hashes the same fields `state_eq` compares.
    fn state_hash(
        &self,
        state: &mut dyn Hasher,
    );
}

impl_downcast!(StateChange);

/// Adapter that lets `Rc<dyn StateChange>` participate in the fnv maps the
/// dedup layer keeps between graph builds. Equality and hashing delegate to
/// the node's structural contract, with the concrete type mixed into the hash
/// so different kinds targeting the same resource do not collide
/// systematically.
#[derive(Clone)]
pub struct StateChangeKey(Rc<dyn StateChange>);

impl StateChangeKey {
    pub fn new(state_change: Rc<dyn StateChange>) -> Self {
        StateChangeKey(state_change)
    }

    pub fn state_change(&self) -> &Rc<dyn StateChange> {
        &self.0
    }
}

impl PartialEq for StateChangeKey {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.0.state_eq(other.0.as_ref())
    }
}

impl Eq for StateChangeKey {}

impl Hash for StateChangeKey {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.0.as_any().type_id().hash(state);
        self.0.state_hash(state);
    }
}

impl fmt::Display for StateChangeKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}
