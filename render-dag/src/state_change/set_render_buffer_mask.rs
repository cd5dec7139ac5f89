use super::StateChange;
use crate::pipeline_task::RenderPipelineTask;
use crate::render_target::{
    RenderBufferMask, RenderTarget, RenderTargetId, RenderTargetListener, RenderTargetRegistry,
};
use crate::RenderDagResult;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// Sets the per-buffer write masks of an offscreen render target.
///
/// Every target can independently allow or forbid writes to its color buffer,
/// depth/stencil buffer and light buffer. The neutral configuration writes to
/// all three. Note that this assumes the target actually carries the buffers
/// being unmasked; unmasking the light buffer of a target created without one
/// is left to the backend to reject.
pub struct SetRenderBufferMask {
    target_id: RenderTargetId,
    registry: Rc<dyn RenderTargetRegistry>,
    mask: RenderBufferMask,

    // Lazily-created caches. Deliberately excluded from state_eq/state_hash.
    task: RefCell<Option<Rc<SetRenderBufferMaskTask>>>,
    default_instance: RefCell<Option<Rc<SetRenderBufferMask>>>,
    is_default: bool,
}

impl SetRenderBufferMask {
    pub fn new(
        target_id: RenderTargetId,
        registry: &Rc<dyn RenderTargetRegistry>,
        color: bool,
        depth: bool,
        light: bool,
    ) -> Rc<Self> {
        Rc::new(SetRenderBufferMask {
            target_id,
            registry: registry.clone(),
            mask: RenderBufferMask {
                color,
                depth,
                light,
            },
            task: Default::default(),
            default_instance: Default::default(),
            is_default: false,
        })
    }

    fn new_default(
        target_id: RenderTargetId,
        registry: &Rc<dyn RenderTargetRegistry>,
    ) -> Rc<Self> {
        Rc::new(SetRenderBufferMask {
            target_id,
            registry: registry.clone(),
            mask: RenderBufferMask::default(),
            task: Default::default(),
            default_instance: Default::default(),
            is_default: true,
        })
    }

    pub fn target_id(&self) -> &RenderTargetId {
        &self.target_id
    }

    pub fn mask(&self) -> RenderBufferMask {
        self.mask
    }
}

impl StateChange for SetRenderBufferMask {
    fn generate_task(self: Rc<Self>) -> RenderDagResult<Rc<dyn RenderPipelineTask>> {
        if let Some(task) = self.task.borrow().as_ref() {
            return Ok(task.clone());
        }

        let render_target = self.registry.render_target(&self.target_id)?;
        let task = Rc::new(SetRenderBufferMaskTask {
            render_target: RefCell::new(render_target),
            mask: self.mask,
        });
        *self.task.borrow_mut() = Some(task.clone());
        log::trace!("generated task for {}", self);

        // Subscribe only now that the node tracks a live resource
        let listener = Rc::downgrade(&self) as Weak<dyn RenderTargetListener>;
        self.registry.subscribe(listener);

        Ok(task)
    }

    fn default_instance(self: Rc<Self>) -> Rc<dyn StateChange> {
        if self.is_default {
            return self;
        }

        self.default_instance
            .borrow_mut()
            .get_or_insert_with(|| {
                SetRenderBufferMask::new_default(self.target_id.clone(), &self.registry)
            })
            .clone()
    }

    fn state_eq(
        &self,
        other: &dyn StateChange,
    ) -> bool {
        other
            .downcast_ref::<SetRenderBufferMask>()
            .map_or(false, |other| {
                self.target_id == other.target_id && self.mask == other.mask
            })
    }

    fn state_hash(
        &self,
        mut state: &mut dyn Hasher,
    ) {
        self.target_id.hash(&mut state);
        self.mask.hash(&mut state);
    }
}

impl RenderTargetListener for SetRenderBufferMask {
    fn on_render_targets_changed(&self) {
        if let Some(task) = self.task.borrow().as_ref() {
            match self.registry.render_target(&self.target_id) {
                Ok(render_target) => task.set_render_target(render_target),
                Err(e) => log::error!("render target vanished from registry: {}", e),
            }
        }
    }
}

impl fmt::Display for SetRenderBufferMask {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(
            f,
            "SetRenderBufferMask: {} color={} depth={} light={}",
            self.target_id, self.mask.color, self.mask.depth, self.mask.light
        )
    }
}

struct SetRenderBufferMaskTask {
    render_target: RefCell<Rc<RenderTarget>>,
    mask: RenderBufferMask,
}

impl SetRenderBufferMaskTask {
    fn set_render_target(
        &self,
        render_target: Rc<RenderTarget>,
    ) {
        *self.render_target.borrow_mut() = render_target;
    }
}

impl RenderPipelineTask for SetRenderBufferMaskTask {
    fn execute(&self) {
        self.render_target.borrow().set_buffer_mask(self.mask);
    }
}

impl fmt::Display for SetRenderBufferMaskTask {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(
            f,
            "SetRenderBufferMaskTask: {} color={} depth={} light={}",
            self.render_target.borrow().id(),
            self.mask.color,
            self.mask.depth,
            self.mask.light
        )
    }
}
