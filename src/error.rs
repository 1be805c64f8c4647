//! Mount-time error type.
//!
//! Nothing after mount is allowed to fail: frames and input handlers degrade
//! to no-ops instead. A mount failure means the visual is absent, never that
//! the surrounding page breaks.

use std::fmt;

/// Reasons a widget could not be attached to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// No global `window` (not running in a browser main thread).
    NoWindow,
    /// `window.document` is missing.
    NoDocument,
    /// No element with the given id.
    CanvasNotFound(String),
    /// The element exists but is not a `<canvas>`.
    NotACanvas(String),
    /// `getContext("2d")` returned nothing (canvas unsupported or context lost).
    ContextUnavailable,
    /// Any other DOM call that threw.
    Dom(String),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::NoWindow => write!(f, "no window available"),
            MountError::NoDocument => write!(f, "window has no document"),
            MountError::CanvasNotFound(id) => write!(f, "no element with id '{id}'"),
            MountError::NotACanvas(id) => write!(f, "element '{id}' is not a canvas"),
            MountError::ContextUnavailable => write!(f, "2d canvas context unavailable"),
            MountError::Dom(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl std::error::Error for MountError {}

#[cfg(target_arch = "wasm32")]
impl From<MountError> for wasm_bindgen::JsValue {
    fn from(err: MountError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl MountError {
    /// Wrap a thrown JS value
    pub fn dom(value: wasm_bindgen::JsValue) -> Self {
        MountError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_element() {
        let err = MountError::CanvasNotFound("hero-sphere".into());
        assert_eq!(err.to_string(), "no element with id 'hero-sphere'");

        let err = MountError::NotACanvas("hero".into());
        assert!(err.to_string().contains("not a canvas"));
    }
}
