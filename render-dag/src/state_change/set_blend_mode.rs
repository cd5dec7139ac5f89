use super::StateChange;
use crate::pipeline_task::RenderPipelineTask;
use crate::render_target::{
    BlendMode, RenderTarget, RenderTargetId, RenderTargetListener, RenderTargetRegistry,
};
use crate::RenderDagResult;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// Selects the blend mode used while writing into an offscreen render target.
/// The neutral configuration is `BlendMode::Disabled`.
pub struct SetBlendMode {
    target_id: RenderTargetId,
    registry: Rc<dyn RenderTargetRegistry>,
    mode: BlendMode,

    task: RefCell<Option<Rc<SetBlendModeTask>>>,
    default_instance: RefCell<Option<Rc<SetBlendMode>>>,
    is_default: bool,
}

impl SetBlendMode {
    pub fn new(
        target_id: RenderTargetId,
        registry: &Rc<dyn RenderTargetRegistry>,
        mode: BlendMode,
    ) -> Rc<Self> {
        Rc::new(SetBlendMode {
            target_id,
            registry: registry.clone(),
            mode,
            task: Default::default(),
            default_instance: Default::default(),
            is_default: false,
        })
    }

    fn new_default(
        target_id: RenderTargetId,
        registry: &Rc<dyn RenderTargetRegistry>,
    ) -> Rc<Self> {
        Rc::new(SetBlendMode {
            target_id,
            registry: registry.clone(),
            mode: BlendMode::default(),
            task: Default::default(),
            default_instance: Default::default(),
            is_default: true,
        })
    }

    pub fn target_id(&self) -> &RenderTargetId {
        &self.target_id
    }

    pub fn mode(&self) -> BlendMode {
        self.mode
    }
}

impl StateChange for SetBlendMode {
    fn generate_task(self: Rc<Self>) -> RenderDagResult<Rc<dyn RenderPipelineTask>> {
        if let Some(task) = self.task.borrow().as_ref() {
            return Ok(task.clone());
        }

        let render_target = self.registry.render_target(&self.target_id)?;
        let task = Rc::new(SetBlendModeTask {
            render_target: RefCell::new(render_target),
            mode: self.mode,
        });
        *self.task.borrow_mut() = Some(task.clone());
        log::trace!("generated task for {}", self);

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
                SetBlendMode::new_default(self.target_id.clone(), &self.registry)
            })
            .clone()
    }

    fn state_eq(
        &self,
        other: &dyn StateChange,
    ) -> bool {
        other.downcast_ref::<SetBlendMode>().map_or(false, |other| {
            self.target_id == other.target_id && self.mode == other.mode
        })
    }

    fn state_hash(
        &self,
        mut state: &mut dyn Hasher,
    ) {
        self.target_id.hash(&mut state);
        self.mode.hash(&mut state);
    }
}

impl RenderTargetListener for SetBlendMode {
    fn on_render_targets_changed(&self) {
        if let Some(task) = self.task.borrow().as_ref() {
            match self.registry.render_target(&self.target_id) {
                Ok(render_target) => task.set_render_target(render_target),
                Err(e) => log::error!("render target vanished from registry: {}", e),
            }
        }
    }
}

impl fmt::Display for SetBlendMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "SetBlendMode: {} {:?}", self.target_id, self.mode)
    }
}

struct SetBlendModeTask {
    render_target: RefCell<Rc<RenderTarget>>,
    mode: BlendMode,
}

impl SetBlendModeTask {
    fn set_render_target(
        &self,
        render_target: Rc<RenderTarget>,
    ) {
        *self.render_target.borrow_mut() = render_target;
    }
}

impl RenderPipelineTask for SetBlendModeTask {
    fn execute(&self) {
        self.render_target.borrow().set_blend_mode(self.mode);
    }
}

impl fmt::Display for SetBlendModeTask {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(
            f,
            "SetBlendModeTask: {} {:?}",
            self.render_target.borrow().id(),
            self.mode
        )
    }
}
