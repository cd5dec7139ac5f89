//! Expresses GPU pipeline state as comparable, lazily-materialized state-change
//! nodes and diffs consecutive frame-graph builds so that only the state
//! transitions that actually changed are issued to the backend.
//!
//! A frame-graph build constructs a [`StateChange`] node per desired piece of
//! state. The [`RenderTaskListGenerator`] deduplicates those nodes against the
//! previous build by value equality, asks each surviving node for its
//! [`RenderPipelineTask`] (created at most once per node), and emits revert
//! tasks - each node's [`StateChange::default_instance`] - for state that
//! dropped out of the configuration. Nodes that reference a registry-owned
//! render target subscribe for recreation notifications when their task is
//! created, so a window resize refreshes the cached task's resource handle
//! in place without rebuilding the graph.
//!
//! Everything here runs on the single render thread; graph construction,
//! diffing, task execution and recreation notifications are sequenced by the
//! caller, so the crate uses `Rc`/`Cell` interior mutability rather than
//! locks.

mod error;
pub use error::RenderDagError;
pub use error::RenderDagResult;

mod render_target;
pub use render_target::BlendMode;
pub use render_target::RenderBufferMask;
pub use render_target::RenderTarget;
pub use render_target::RenderTargetExtents;
pub use render_target::RenderTargetId;
pub use render_target::RenderTargetListener;
pub use render_target::RenderTargetRegistry;

mod pipeline_task;
pub use pipeline_task::RenderPipelineTask;

pub mod state_change;
pub use state_change::SetBlendMode;
pub use state_change::SetRenderBufferMask;
pub use state_change::SetScissorTest;
pub use state_change::StateChange;
pub use state_change::StateChangeKey;

mod task_list;
pub use task_list::RenderTaskListGenerator;

#[cfg(test)]
pub(crate) mod test_support;
