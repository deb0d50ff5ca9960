//! Global constants for the SpeciScan client

/// Default endpoint for image identification uploads
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "/upload_image";

/// Default endpoint for species name searches
pub const DEFAULT_SEARCH_ENDPOINT: &str = "/search_by_name";

/// Main image shown when the response carries no usable first image
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/300x250?text=No+Image+Available";

/// Default request timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 60_000;

/// Multipart field carrying the uploaded image
pub const UPLOAD_FIELD: &str = "file";

/// Form field carrying the searched species name
pub const SPECIES_NAME_FIELD: &str = "species_name";

/// Element ids the page is expected to provide.
pub mod ids {
    pub const UPLOAD_FORM: &str = "upload-form";
    pub const NAME_FORM: &str = "name-form";
    pub const FILE_INPUT: &str = "file-input";
    pub const FILE_NAME: &str = "file-name";
    pub const UPLOAD_ZONE: &str = "upload-zone";
    pub const RESULTS: &str = "results";
    pub const LOADING_OVERLAY: &str = "loading-overlay";
}

/// CSS classes toggled by the controller.
pub mod classes {
    pub const ACTIVE: &str = "active";
    pub const HAS_FILE: &str = "has-file";
    pub const DRAGOVER: &str = "dragover";
    /// Selector for suggestion chips
    pub const CHIP_SELECTOR: &str = ".chip";
    /// Attribute holding a chip's species name
    pub const CHIP_SPECIES_ATTR: &str = "data-species";
}
