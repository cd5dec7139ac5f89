use crate::render_target::RenderTargetId;

pub type RenderDagResult<T> = Result<T, RenderDagError>;

/// Generic error that contains all the different kinds of errors that may occur
/// while building a frame's task list
#[derive(Debug, Clone)]
pub enum RenderDagError {
    StringError(String),
    /// A state change referenced a render target the registry does not track.
    /// The frame-graph configuration is internally inconsistent and the build
    /// must abort.
    RenderTargetNotFound(RenderTargetId),
}

impl std::error::Error for RenderDagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            RenderDagError::StringError(_) => None,
            RenderDagError::RenderTargetNotFound(_) => None,
        }
    }
}

impl core::fmt::Display for RenderDagError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            RenderDagError::StringError(ref e) => e.fmt(fmt),
            RenderDagError::RenderTargetNotFound(ref id) => {
                write!(fmt, "no render target is registered as {}", id)
            }
        }
    }
}

impl From<&str> for RenderDagError {
    fn from(str: &str) -> Self {
        RenderDagError::StringError(str.to_string())
    }
}

impl From<String> for RenderDagError {
    fn from(string: String) -> Self {
        RenderDagError::StringError(string)
    }
}
