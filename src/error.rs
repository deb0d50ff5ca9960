//! Error types for form submissions.

/// Errors that can end a submission attempt.
///
/// Domain errors reported inside a response body are not represented here;
/// they are rendered into the page by [`crate::render`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Upload submitted without a file
    #[error("Please select an image file.")]
    NoFileSelected,

    /// Upload submitted with a file that is not an accepted image type
    #[error("File type not allowed. Please upload an image file (PNG, JPG, JPEG, GIF).")]
    UnsupportedFileType(String),

    /// Name search submitted with a blank species name
    #[error("Please enter a species name.")]
    EmptySpeciesName,

    /// The endpoint answered with a non-success status
    #[error("Network response was not ok")]
    HttpStatus(u16),

    /// The request could not be completed
    #[error("{0}")]
    Network(String),

    /// The request was aborted after the configured timeout
    #[error("Request timed out after {0} ms")]
    Timeout(u32),

    /// The response body was not a valid payload
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A results template failed to render
    #[error("Failed to render results: {0}")]
    Render(#[from] askama::Error),

    /// A page element or browser API needed for binding is missing
    #[error("Page setup failed: {0}")]
    Dom(String),
}

impl ClientError {
    /// User-input errors block the submission before any request is made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ClientError::NoFileSelected
                | ClientError::UnsupportedFileType(_)
                | ClientError::EmptySpeciesName
        )
    }

    /// Text shown to the user in an alert.
    pub fn alert_message(&self) -> String {
        if self.is_input_error() {
            self.to_string()
        } else {
            format!("Error: {}", self)
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ClientError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        use wasm_bindgen::JsCast;

        let message = match value.dyn_ref::<js_sys::Error>() {
            Some(error) => String::from(error.message()),
            None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
        };
        ClientError::Network(message)
    }
}
