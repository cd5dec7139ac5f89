use std::fmt;

/// A single executable state mutation emitted into the frame's task list.
///
/// Tasks are created at most once by the state change that owns them and are
/// never deduplicated themselves; value equality lives on the state change.
/// Executing a task is idempotent and touches exactly the state it represents.
pub trait RenderPipelineTask: fmt::Display {
    fn execute(&self);
}
