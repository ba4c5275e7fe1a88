// Test doubles for the platform seams (transport, navigation, confirmation)

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::UploadProgress;
use crate::services::browser::{Confirmer, Navigator};
use crate::services::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, ProgressCallback, Transport};

pub(crate) const BASE_URL: &str = "http://localhost:8000";

pub(crate) enum Reply {
    Ready(Result<HttpResponse, ApiError>),
    Gated(oneshot::Receiver<Result<HttpResponse, ApiError>>),
}

impl Reply {
    pub(crate) fn json(status: u16, body: serde_json::Value) -> Self {
        Reply::Ready(Ok(HttpResponse::new(status, body.to_string())))
    }

    pub(crate) fn raw(status: u16, body: &str) -> Self {
        Reply::Ready(Ok(HttpResponse::new(status, body)))
    }

    pub(crate) fn network(text: &str) -> Self {
        Reply::Ready(Err(ApiError::transport(text)))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SentForm {
    pub url: String,
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file_name: String,
    pub content_type: String,
    pub with_progress: bool,
}

/// Scripted transport: each expectation answers one matching request, in order
#[derive(Default)]
pub(crate) struct MockTransport {
    expectations: RefCell<Vec<(HttpMethod, String, Reply)>>,
    requests: RefCell<Vec<HttpRequest>>,
    form_replies: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    forms: RefCell<Vec<SentForm>>,
}

impl MockTransport {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn expect(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.expectations
            .borrow_mut()
            .push((method, path.to_string(), reply));
    }

    /// The request stays pending until the returned sender fires
    pub(crate) fn gate(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> oneshot::Sender<Result<HttpResponse, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.expect(method, path, Reply::Gated(rx));
        tx
    }

    pub(crate) fn expect_form(&self, reply: Result<HttpResponse, ApiError>) {
        self.form_replies.borrow_mut().push_back(reply);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    /// `"METHOD /path"` for every request, in order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), r.url.trim_start_matches(BASE_URL)))
            .collect()
    }

    pub(crate) fn forms(&self) -> Vec<SentForm> {
        self.forms.borrow().clone()
    }

    pub(crate) fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let reply = {
            let mut expectations = self.expectations.borrow_mut();
            let position = expectations
                .iter()
                .position(|(method, path, _)| *method == request.method && request.url.ends_with(path.as_str()));
            match position {
                Some(index) => expectations.remove(index).2,
                None => panic!("unexpected request {} {}", request.method.as_str(), request.url),
            }
        };
        self.requests.borrow_mut().push(request);

        match reply {
            Reply::Ready(result) => result,
            Reply::Gated(rx) => rx.await.unwrap_or(Err(ApiError::Aborted)),
        }
    }

    async fn send_form(
        &self,
        url: &str,
        form: MultipartForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<HttpResponse, ApiError> {
        let total = form.file.size();
        self.forms.borrow_mut().push(SentForm {
            url: url.to_string(),
            fields: form.fields.clone(),
            file_field: form.file_field.clone(),
            file_name: form.file.name.clone(),
            content_type: form.file.effective_content_type(),
            with_progress: on_progress.is_some(),
        });

        let reply = self
            .form_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected upload to {}", url));

        if let (Some(callback), Ok(_)) = (on_progress, &reply) {
            callback(UploadProgress::new(total / 2, total));
            callback(UploadProgress::new(total, total));
        }
        reply
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_string());
    }

    fn replace(&self, path: &str) {
        self.visits.borrow_mut().push(format!("replace:{}", path));
    }
}

/// Answers every confirmation with a fixed choice and counts the prompts
pub(crate) struct ScriptedConfirmer {
    answer: bool,
    prompts: Cell<usize>,
}

impl ScriptedConfirmer {
    pub(crate) fn answering(answer: bool) -> Rc<Self> {
        Rc::new(Self {
            answer,
            prompts: Cell::new(0),
        })
    }

    pub(crate) fn prompts(&self) -> usize {
        self.prompts.get()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, _message: &str) -> bool {
        self.prompts.set(self.prompts.get() + 1);
        self.answer
    }
}
