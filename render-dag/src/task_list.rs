use crate::pipeline_task::RenderPipelineTask;
use crate::state_change::{StateChange, StateChangeKey};
use crate::RenderDagResult;
use fnv::FnvHashSet;
use std::rc::Rc;

/// Diffs the state-change configuration of consecutive frame-graph builds so
/// only the transitions that actually changed are issued to the backend.
///
/// The generator keeps the set of state changes currently in effect. On each
/// build [`RenderTaskListGenerator::refresh`] compares the requested
/// configuration against that set by value equality:
///
/// * a requested node equal to an active one is a no-op - the active node
///   (and its already-generated task) stays, and `generate_task` is never
///   called on the newcomer
/// * an active node absent from the request is reverted by emitting its
///   default instance's task
/// * a genuinely new node has its task generated and joins the active set
///
/// Any configuration error (an unknown render target) aborts the refresh and
/// leaves the active set exactly as it was, so the caller can fail the graph
/// build without tearing down state that is still in effect.
pub struct RenderTaskListGenerator {
    active: FnvHashSet<StateChangeKey>,
}

impl RenderTaskListGenerator {
    pub fn new() -> Self {
        RenderTaskListGenerator {
            active: Default::default(),
        }
    }

    /// Diffs `requested` against the active configuration and returns the
    /// tasks to issue for this build: revert tasks for dropped state first,
    /// then tasks for newly inserted state in request order. Unchanged state
    /// emits nothing. Duplicate entries within one request collapse to the
    /// first occurrence.
    #[profiling::function]
    pub fn refresh(
        &mut self,
        requested: &[Rc<dyn StateChange>],
    ) -> RenderDagResult<Vec<Rc<dyn RenderPipelineTask>>> {
        let mut requested_keys =
            FnvHashSet::with_capacity_and_hasher(requested.len(), Default::default());
        let mut incoming = Vec::new();
        for state_change in requested {
            let key = StateChangeKey::new(state_change.clone());
            if !requested_keys.insert(key.clone()) {
                log::trace!("duplicate state change requested: {}", state_change);
                continue;
            }

            if !self.active.contains(&key) {
                incoming.push(key);
            }
        }

        let outgoing: Vec<StateChangeKey> = self
            .active
            .iter()
            .filter(|key| !requested_keys.contains(key))
            .cloned()
            .collect();

        // Generate every task before touching the active set so a
        // configuration error leaves the previous configuration in effect.
        let mut tasks = Vec::with_capacity(outgoing.len() + incoming.len());
        for key in &outgoing {
            let default_instance = key.state_change().clone().default_instance();
            log::debug!("reverting {}", key.state_change());
            tasks.push(default_instance.generate_task()?);
        }
        for key in &incoming {
            log::debug!("inserting {}", key.state_change());
            tasks.push(key.state_change().clone().generate_task()?);
        }

        for key in outgoing {
            self.active.remove(&key);
        }
        for key in incoming {
            self.active.insert(key);
        }

        log::trace!(
            "task list refreshed: {} tasks, {} state changes active",
            tasks.len(),
            self.active.len()
        );
        Ok(tasks)
    }

    /// The state changes currently in effect, in no particular order.
    pub fn active_state_changes(&self) -> impl Iterator<Item = &Rc<dyn StateChange>> {
        self.active.iter().map(|key| key.state_change())
    }

    /// Logs the active configuration, one state change per line. Diagnostics
    /// only.
    pub fn log_active_state_changes(&self) {
        for state_change in self.active_state_changes() {
            log::debug!("active: {}", state_change);
        }
    }
}

impl Default for RenderTaskListGenerator {
    fn default() -> Self {
        RenderTaskListGenerator::new()
    }
}
