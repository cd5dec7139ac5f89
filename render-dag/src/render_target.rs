use crate::RenderDagResult;
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifies a render target within a registry. The name is interned so graph
/// builders can clone the id into every state change that mentions the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTargetId(Rc<str>);

impl RenderTargetId {
    pub fn new(name: &str) -> Self {
        RenderTargetId(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RenderTargetId {
    fn from(name: &str) -> Self {
        RenderTargetId::new(name)
    }
}

impl fmt::Display for RenderTargetId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenderTargetExtents {
    pub width: u32,
    pub height: u32,
}

/// Per-buffer write enables for a render target. A target can independently
/// allow or forbid writes to its color, depth/stencil and light buffers. The
/// default allows writing to all three.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RenderBufferMask {
    pub color: bool,
    pub depth: bool,
    pub light: bool,
}

impl Default for RenderBufferMask {
    fn default() -> Self {
        RenderBufferMask {
            color: true,
            depth: true,
            light: true,
        }
    }
}

/// Blend state applied while a pass writes into a target. The default leaves
/// blending disabled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    #[default]
    Disabled,
    Alpha,
    Additive,
}

/// Engine-side record of one offscreen render target.
///
/// The state slots below are the per-target pipeline state that
/// `RenderPipelineTask`s mutate. A concrete backend would issue the matching
/// API calls from these setters; keeping the state here lets the rest of the
/// crate stay independent of any graphics API. Setters take `&self` because
/// tasks hold shared handles to the current instance.
#[derive(Debug)]
pub struct RenderTarget {
    id: RenderTargetId,
    extents: RenderTargetExtents,
    buffer_mask: Cell<RenderBufferMask>,
    blend_mode: Cell<BlendMode>,
    scissor_test: Cell<bool>,
}

impl RenderTarget {
    pub fn new(
        id: RenderTargetId,
        extents: RenderTargetExtents,
    ) -> Self {
        RenderTarget {
            id,
            extents,
            buffer_mask: Cell::new(RenderBufferMask::default()),
            blend_mode: Cell::new(BlendMode::default()),
            scissor_test: Cell::new(false),
        }
    }

    pub fn id(&self) -> &RenderTargetId {
        &self.id
    }

    pub fn extents(&self) -> RenderTargetExtents {
        self.extents
    }

    pub fn buffer_mask(&self) -> RenderBufferMask {
        self.buffer_mask.get()
    }

    pub fn set_buffer_mask(
        &self,
        mask: RenderBufferMask,
    ) {
        log::trace!("render target {}: buffer mask {:?}", self.id, mask);
        self.buffer_mask.set(mask);
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode.get()
    }

    pub fn set_blend_mode(
        &self,
        mode: BlendMode,
    ) {
        log::trace!("render target {}: blend mode {:?}", self.id, mode);
        self.blend_mode.set(mode);
    }

    pub fn scissor_test(&self) -> bool {
        self.scissor_test.get()
    }

    pub fn set_scissor_test(
        &self,
        enabled: bool,
    ) {
        log::trace!("render target {}: scissor test {}", self.id, enabled);
        self.scissor_test.set(enabled);
    }
}

/// Owner of the offscreen render targets.
///
/// Implementations recreate targets on demand (for example when the window is
/// resized) and notify subscribers afterwards. The registry outlives every
/// state change that references it.
pub trait RenderTargetRegistry {
    /// Resolves the current instance registered under `id`. An unknown id is a
    /// configuration error, not a transient condition, and fails the lookup.
    fn render_target(
        &self,
        id: &RenderTargetId,
    ) -> RenderDagResult<Rc<RenderTarget>>;

    /// Registers a listener to be notified after any tracked target has been
    /// recreated. Listeners are held weakly; dropping the listener is enough
    /// to unsubscribe.
    fn subscribe(
        &self,
        listener: Weak<dyn RenderTargetListener>,
    );
}

/// Receives the registry's recreation notifications. There is no payload
/// identifying which target changed; the listener re-resolves whatever it
/// tracks via [`RenderTargetRegistry::render_target`].
pub trait RenderTargetListener {
    fn on_render_targets_changed(&self);
}
