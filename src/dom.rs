//! Browser page access for the WASM build.
//!
//! Element references are looked up once at start-up; a missing element is a
//! page setup error.

use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, File, FileList, HtmlElement, HtmlFormElement, HtmlInputElement,
    ScrollBehavior, ScrollIntoViewOptions, Window,
};

use crate::constants::{classes, ids};
use crate::controller::Page;
use crate::error::ClientError;

/// The identification page's elements.
pub struct DomPage {
    window: Window,
    document: Document,
    upload_form: HtmlFormElement,
    name_form: HtmlFormElement,
    file_input: HtmlInputElement,
    file_name: HtmlElement,
    upload_zone: Element,
    results: Element,
    loading_overlay: Element,
    species_input: HtmlInputElement,
}

impl DomPage {
    /// Look up every element the controller needs.
    pub fn acquire() -> Result<Self, ClientError> {
        let window = web_sys::window().ok_or_else(|| ClientError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| ClientError::Dom("no document".to_string()))?;

        let name_form: HtmlFormElement = element_by_id(&document, ids::NAME_FORM)?;
        let selector = format!(r#"input[name="{}"]"#, crate::constants::SPECIES_NAME_FIELD);
        let species_input: HtmlInputElement = name_form
            .query_selector(&selector)?
            .ok_or_else(|| ClientError::Dom(format!("missing element '{}'", selector)))?
            .dyn_into()
            .map_err(|_| ClientError::Dom(format!("'{}' is not an input", selector)))?;

        Ok(Self {
            upload_form: element_by_id(&document, ids::UPLOAD_FORM)?,
            file_input: element_by_id(&document, ids::FILE_INPUT)?,
            file_name: element_by_id(&document, ids::FILE_NAME)?,
            upload_zone: element_by_id(&document, ids::UPLOAD_ZONE)?,
            results: element_by_id(&document, ids::RESULTS)?,
            loading_overlay: element_by_id(&document, ids::LOADING_OVERLAY)?,
            name_form,
            species_input,
            window,
            document,
        })
    }

    pub fn upload_form(&self) -> &HtmlFormElement {
        &self.upload_form
    }

    pub fn name_form(&self) -> &HtmlFormElement {
        &self.name_form
    }

    pub fn file_input(&self) -> &HtmlInputElement {
        &self.file_input
    }

    pub fn upload_zone(&self) -> &Element {
        &self.upload_zone
    }

    /// Suggestion chips currently on the page.
    pub fn chips(&self) -> Result<Vec<Element>, ClientError> {
        let nodes = self.document.query_selector_all(classes::CHIP_SELECTOR)?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    /// Put dropped files into the upload input.
    pub fn mirror_dropped_files(&self, files: &FileList) {
        self.file_input.set_files(Some(files));
    }

    pub fn set_dragover(&self, active: bool) {
        toggle_class(&self.upload_zone, classes::DRAGOVER, active);
    }
}

impl Page for DomPage {
    type File = File;

    fn selected_file(&self) -> Option<File> {
        self.file_input.files().and_then(|files| files.get(0))
    }

    fn file_name(&self, file: &File) -> String {
        file.name()
    }

    fn species_name(&self) -> String {
        self.species_input.value()
    }

    fn set_species_name(&self, name: &str) {
        self.species_input.set_value(name);
    }

    fn set_file_label(&self, name: Option<&str>) {
        self.file_name.set_text_content(Some(name.unwrap_or_default()));
        toggle_class(&self.upload_zone, classes::HAS_FILE, name.is_some());
    }

    fn set_loading(&self, active: bool) {
        toggle_class(&self.loading_overlay, classes::ACTIVE, active);
    }

    fn show_results(&self, html: &str) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        self.results
            .scroll_into_view_with_scroll_into_view_options(&options);

        self.results.set_inner_html(html);
        toggle_class(&self.results, classes::ACTIVE, true);
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            log::warn!("Failed to show alert: {:?}", e);
        }
    }
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, ClientError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ClientError::Dom(format!("missing element '#{}'", id)))?
        .dyn_into()
        .map_err(|_| ClientError::Dom(format!("element '#{}' has an unexpected type", id)))
}

fn toggle_class(element: &Element, class: &str, on: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class, on) {
        log::warn!("Failed to toggle class '{}': {:?}", class, e);
    }
}
