//! Input checks run before a form is sent.

use crate::error::ClientError;

/// Image file extensions the identification endpoint accepts.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Check if a filename has an accepted image extension.
pub fn is_allowed_image_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Validate the name of the file chosen for upload.
pub fn validate_image_name(filename: &str) -> Result<(), ClientError> {
    if !is_allowed_image_file(filename) {
        return Err(ClientError::UnsupportedFileType(filename.to_string()));
    }
    Ok(())
}

/// Reject a species name that is empty or only whitespace.
///
/// The name itself is sent as typed; surrounding whitespace is left to the backend.
pub fn validate_species_name(name: &str) -> Result<(), ClientError> {
    if name.trim().is_empty() {
        return Err(ClientError::EmptySpeciesName);
    }
    Ok(())
}
