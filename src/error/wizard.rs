//! Install wizard document errors

use super::ModlayerError;

/// Creates a malformed descriptor error
pub fn malformed(message: impl Into<String>) -> ModlayerError {
    ModlayerError::MalformedDescriptor {
        message: message.into(),
    }
}

/// Creates a missing attribute error for a wizard element
pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> ModlayerError {
    ModlayerError::MissingAttribute {
        element: element.into(),
        attribute: attribute.into(),
    }
}

/// Creates a prompt failure error
pub fn prompt_failed(message: impl Into<String>) -> ModlayerError {
    ModlayerError::PromptFailed {
        message: message.into(),
    }
}
