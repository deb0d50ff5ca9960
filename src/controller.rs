//! Form controller: turns page events into requests and rendered results.
//!
//! The controller never touches the browser directly. Page access goes through
//! [`Page`] and network access through [`Transport`], so the same flow drives
//! the wasm build and the tests.

use web_time::Instant;

use crate::error::ClientError;
use crate::model::UploadResult;
use crate::render::{RenderKind, ResultRenderer};
use crate::submission::{validate_image_name, validate_species_name};

/// Page elements the controller reads from and writes to.
pub trait Page {
    /// Handle to a file chosen by the user.
    type File;

    /// First file currently held by the upload input.
    fn selected_file(&self) -> Option<Self::File>;

    /// Name of a chosen file.
    fn file_name(&self, file: &Self::File) -> String;

    /// Current value of the species name field.
    fn species_name(&self) -> String;

    fn set_species_name(&self, name: &str);

    /// Show the chosen file's name, or clear the label with `None`.
    fn set_file_label(&self, name: Option<&str>);

    /// Show or hide the loading indicator.
    fn set_loading(&self, active: bool);

    /// Replace the results container's content, reveal it and scroll to it.
    fn show_results(&self, html: &str);

    fn alert(&self, message: &str);
}

/// Sends the two form submissions to the backend.
pub trait Transport<F> {
    /// POST `file` as multipart field `file`.
    fn upload_image(&self, file: &F)
    -> impl Future<Output = Result<UploadResult, ClientError>>;

    /// POST `species_name` as a form field.
    fn search_by_name(
        &self,
        species_name: &str,
    ) -> impl Future<Output = Result<UploadResult, ClientError>>;
}

/// Drives both forms of the page.
pub struct FormController<P, T> {
    page: P,
    transport: T,
    renderer: ResultRenderer,
}

impl<P, T> FormController<P, T>
where
    P: Page,
    T: Transport<P::File>,
{
    pub fn new(page: P, transport: T, renderer: ResultRenderer) -> Self {
        Self {
            page,
            transport,
            renderer,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reflect the upload input's current file in the filename label.
    pub fn file_selected(&self) {
        let name = self
            .page
            .selected_file()
            .map(|file| self.page.file_name(&file));
        match &name {
            Some(name) => log::debug!("📂 File selected: {}", name),
            None => log::debug!("📂 File selection cleared"),
        }
        self.page.set_file_label(name.as_deref());
    }

    /// Handle submission of the upload form.
    pub async fn submit_upload(&self) -> Result<RenderKind, ClientError> {
        let Some(file) = self.page.selected_file() else {
            return Err(self.report(ClientError::NoFileSelected));
        };
        let name = self.page.file_name(&file);
        if let Err(e) = validate_image_name(&name) {
            return Err(self.report(e));
        }

        log::info!("📤 Uploading {} for identification", name);
        self.send(self.transport.upload_image(&file)).await
    }

    /// Handle submission of the name search form.
    pub async fn submit_name(&self) -> Result<RenderKind, ClientError> {
        let species_name = self.page.species_name();
        if let Err(e) = validate_species_name(&species_name) {
            return Err(self.report(e));
        }

        log::info!("🔎 Searching for species '{}'", species_name);
        self.send(self.transport.search_by_name(&species_name)).await
    }

    /// Fill the name field from a suggestion chip and search for it.
    pub async fn choose_suggestion(&self, species_name: &str) -> Result<RenderKind, ClientError> {
        self.page.set_species_name(species_name);
        self.submit_name().await
    }

    /// Await a request while the loading indicator is shown.
    async fn send(
        &self,
        request: impl Future<Output = Result<UploadResult, ClientError>>,
    ) -> Result<RenderKind, ClientError> {
        let started = Instant::now();
        self.page.set_loading(true);
        let response = request.await;
        self.page.set_loading(false);
        log::debug!("Request finished in {:?}", started.elapsed());

        response
            .and_then(|result| self.display(&result))
            .map_err(|e| self.report(e))
    }

    /// Render a response into the results container.
    pub fn display(&self, result: &UploadResult) -> Result<RenderKind, ClientError> {
        let rendered = self.renderer.render(result)?;
        log::info!("Rendering {} result", rendered.kind.name());
        self.page.show_results(&rendered.html);
        Ok(rendered.kind)
    }

    fn report(&self, error: ClientError) -> ClientError {
        if error.is_input_error() {
            log::warn!("Submission rejected: {}", error);
        } else {
            log::error!("Error: {}", error);
        }
        self.page.alert(&error.alert_message());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Recording page with an in-memory file slot.
    #[derive(Default)]
    struct FakePage {
        file: RefCell<Option<String>>,
        species_name: RefCell<String>,
        label: RefCell<Option<String>>,
        loading: Cell<bool>,
        loading_changes: RefCell<Vec<bool>>,
        results: RefCell<Option<String>>,
        alerts: RefCell<Vec<String>>,
    }

    impl Page for FakePage {
        type File = String;

        fn selected_file(&self) -> Option<String> {
            self.file.borrow().clone()
        }

        fn file_name(&self, file: &String) -> String {
            file.clone()
        }

        fn species_name(&self) -> String {
            self.species_name.borrow().clone()
        }

        fn set_species_name(&self, name: &str) {
            *self.species_name.borrow_mut() = name.to_string();
        }

        fn set_file_label(&self, name: Option<&str>) {
            *self.label.borrow_mut() = name.map(str::to_string);
        }

        fn set_loading(&self, active: bool) {
            self.loading.set(active);
            self.loading_changes.borrow_mut().push(active);
        }

        fn show_results(&self, html: &str) {
            *self.results.borrow_mut() = Some(html.to_string());
        }

        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
    }

    /// Transport answering every request with a canned outcome.
    struct FakeTransport {
        response: Box<dyn Fn() -> Result<UploadResult, ClientError>>,
        uploads: RefCell<Vec<String>>,
        searches: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn answering(response: impl Fn() -> Result<UploadResult, ClientError> + 'static) -> Self {
            Self {
                response: Box::new(response),
                uploads: RefCell::new(Vec::new()),
                searches: RefCell::new(Vec::new()),
            }
        }

        fn requests(&self) -> usize {
            self.uploads.borrow().len() + self.searches.borrow().len()
        }
    }

    impl Transport<String> for FakeTransport {
        async fn upload_image(&self, file: &String) -> Result<UploadResult, ClientError> {
            self.uploads.borrow_mut().push(file.clone());
            (self.response)()
        }

        async fn search_by_name(&self, species_name: &str) -> Result<UploadResult, ClientError> {
            self.searches.borrow_mut().push(species_name.to_string());
            (self.response)()
        }
    }

    fn lion() -> UploadResult {
        UploadResult::from_json(
            r#"{ "species_data": { "title": "Panthera leo", "classification": {} }, "images": [] }"#,
        )
        .unwrap()
    }

    fn controller(transport: FakeTransport) -> FormController<FakePage, FakeTransport> {
        FormController::new(FakePage::default(), transport, ResultRenderer::default())
    }

    #[test]
    fn test_upload_without_file_never_sends() {
        let ctrl = controller(FakeTransport::answering(|| Ok(lion())));

        let outcome = pollster::block_on(ctrl.submit_upload());

        assert!(matches!(outcome, Err(ClientError::NoFileSelected)));
        assert_eq!(ctrl.transport().requests(), 0);
        assert_eq!(
            *ctrl.page().alerts.borrow(),
            vec!["Please select an image file.".to_string()]
        );
        assert!(ctrl.page().loading_changes.borrow().is_empty());
        assert!(ctrl.page().results.borrow().is_none());
    }

    #[test]
    fn test_upload_with_disallowed_type_never_sends() {
        let ctrl = controller(FakeTransport::answering(|| Ok(lion())));
        *ctrl.page().file.borrow_mut() = Some("notes.txt".to_string());

        let outcome = pollster::block_on(ctrl.submit_upload());

        assert!(matches!(outcome, Err(ClientError::UnsupportedFileType(_))));
        assert_eq!(ctrl.transport().requests(), 0);
        assert_eq!(ctrl.page().alerts.borrow().len(), 1);
    }

    #[test]
    fn test_upload_renders_results() {
        let ctrl = controller(FakeTransport::answering(|| Ok(lion())));
        *ctrl.page().file.borrow_mut() = Some("lion.jpg".to_string());

        let outcome = pollster::block_on(ctrl.submit_upload());

        assert_eq!(outcome.unwrap(), RenderKind::Full);
        assert_eq!(*ctrl.transport().uploads.borrow(), vec!["lion.jpg".to_string()]);
        assert_eq!(*ctrl.page().loading_changes.borrow(), vec![true, false]);
        assert!(ctrl.page().alerts.borrow().is_empty());
        let results = ctrl.page().results.borrow();
        assert!(results.as_deref().unwrap().contains("Panthera leo"));
    }

    #[test]
    fn test_transport_failures_clear_loading_and_alert() {
        let failures: [fn() -> ClientError; 3] = [
            || ClientError::HttpStatus(502),
            || ClientError::Network("Failed to fetch".to_string()),
            || ClientError::Timeout(250),
        ];

        for failure in failures {
            let ctrl = controller(FakeTransport::answering(move || Err(failure())));
            *ctrl.page().file.borrow_mut() = Some("lion.png".to_string());

            let outcome = pollster::block_on(ctrl.submit_upload());

            let expected = format!("Error: {}", failure());
            assert!(outcome.is_err());
            assert!(!ctrl.page().loading.get());
            assert_eq!(*ctrl.page().loading_changes.borrow(), vec![true, false]);
            assert_eq!(*ctrl.page().alerts.borrow(), vec![expected]);
            assert!(ctrl.page().results.borrow().is_none());
        }
    }

    #[test]
    fn test_domain_errors_are_rendered_not_alerted() {
        let ctrl = controller(FakeTransport::answering(|| {
            UploadResult::from_json(r#"{ "error": "Species not found" }"#)
                .map_err(ClientError::from)
        }));
        ctrl.page().set_species_name("Unicornis");

        let outcome = pollster::block_on(ctrl.submit_name());

        assert_eq!(outcome.unwrap(), RenderKind::Error);
        assert!(ctrl.page().alerts.borrow().is_empty());
        let results = ctrl.page().results.borrow();
        assert!(results.as_deref().unwrap().contains("Species not found"));
    }

    #[test]
    fn test_blank_species_name_never_sends() {
        let ctrl = controller(FakeTransport::answering(|| Ok(lion())));
        ctrl.page().set_species_name("   ");

        let outcome = pollster::block_on(ctrl.submit_name());

        assert!(matches!(outcome, Err(ClientError::EmptySpeciesName)));
        assert_eq!(ctrl.transport().requests(), 0);
        assert_eq!(
            *ctrl.page().alerts.borrow(),
            vec!["Please enter a species name.".to_string()]
        );
    }

    #[test]
    fn test_species_name_is_sent_as_typed() {
        let ctrl = controller(FakeTransport::answering(|| Ok(lion())));
        ctrl.page().set_species_name("  Panthera leo ");

        let outcome = pollster::block_on(ctrl.submit_name());

        assert_eq!(outcome.unwrap(), RenderKind::Full);
        assert_eq!(
            *ctrl.transport().searches.borrow(),
            vec!["  Panthera leo ".to_string()]
        );
    }

    #[test]
    fn test_suggestion_fills_field_and_searches() {
        let ctrl = controller(FakeTransport::answering(|| Ok(lion())));

        let outcome = pollster::block_on(ctrl.choose_suggestion("Panthera leo"));

        assert_eq!(outcome.unwrap(), RenderKind::Full);
        assert_eq!(*ctrl.page().species_name.borrow(), "Panthera leo");
        assert_eq!(
            *ctrl.transport().searches.borrow(),
            vec!["Panthera leo".to_string()]
        );
    }

    #[test]
    fn test_file_label_follows_selection() {
        let ctrl = controller(FakeTransport::answering(|| Ok(lion())));

        *ctrl.page().file.borrow_mut() = Some("rose.gif".to_string());
        ctrl.file_selected();
        assert_eq!(ctrl.page().label.borrow().as_deref(), Some("rose.gif"));

        *ctrl.page().file.borrow_mut() = None;
        ctrl.file_selected();
        assert!(ctrl.page().label.borrow().is_none());
    }
}
