//! URL submission controller
//!
//! Per submission: Idle → Validating → (invalid → error shown → Idle) or
//! (valid → Loading → result or error shown → Idle). `begin` performs the
//! synchronous half and hands out a ticket; `complete` applies the outcome
//! and restores the submit control on every path. `submit` runs both around
//! a single awaited request.

use std::sync::Arc;

use crate::api::{ApiError, DownloadApi};
use crate::models::VideoInfo;
use crate::page::{Page, SUBMIT_BUSY_LABEL, SUBMIT_LABEL};
use crate::render;

/// Validation message for an empty input
pub const EMPTY_URL_MESSAGE: &str = "Please enter a TikTok URL.";

/// Handle for one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub token: u64,
    pub url: String,
}

/// How a submit action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty; nothing was sent
    Invalid,
    /// A request is already in flight; the action was ignored
    Busy,
    /// Result card shown
    Displayed,
    /// Error area shown with this message
    Failed(String),
    /// Response belonged to a superseded request and was dropped
    Stale,
}

pub struct SubmissionController<A: ?Sized> {
    api: Arc<A>,
    next_token: u64,
    in_flight: Option<u64>,
}

impl<A: DownloadApi + ?Sized> SubmissionController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            next_token: 1,
            in_flight: None,
        }
    }

    /// Shared handle to the API, for running a ticket on another task
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate the input and switch the page into its loading state
    pub fn begin(&mut self, page: &mut Page) -> Result<Ticket, SubmitOutcome> {
        if self.in_flight.is_some() || page.submit.disabled {
            tracing::debug!("submit ignored, request already in flight");
            return Err(SubmitOutcome::Busy);
        }

        let url = page.input.value.trim().to_string();
        if url.is_empty() {
            render::show_error(page, EMPTY_URL_MESSAGE);
            return Err(SubmitOutcome::Invalid);
        }

        page.submit.disabled = true;
        page.submit.label = SUBMIT_BUSY_LABEL.to_string();
        page.skeleton_hidden = false;
        page.result.hidden = true;
        page.error.hidden = true;

        let token = self.next_token;
        self.next_token += 1;
        self.in_flight = Some(token);

        tracing::info!("submitting {} (request #{})", url, token);
        Ok(Ticket { token, url })
    }

    /// Apply the response for `token` and return the page to idle
    pub fn complete(
        &mut self,
        page: &mut Page,
        token: u64,
        result: Result<VideoInfo, ApiError>,
    ) -> SubmitOutcome {
        if self.in_flight != Some(token) {
            tracing::debug!("dropping stale response for request #{}", token);
            return SubmitOutcome::Stale;
        }
        self.in_flight = None;

        let outcome = match result {
            Ok(info) => {
                render::display_video_info(page, &info);
                SubmitOutcome::Displayed
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!("request #{} failed: {}", token, message);
                render::show_error(page, &message);
                SubmitOutcome::Failed(message)
            }
        };

        page.submit.disabled = false;
        page.submit.label = SUBMIT_LABEL.to_string();
        page.skeleton_hidden = true;

        outcome
    }

    /// Full submit action: validate, request once, render, restore
    pub async fn submit(&mut self, page: &mut Page) -> SubmitOutcome {
        let ticket = match self.begin(page) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let result = self.api.fetch_video_info(&ticket.url).await;
        self.complete(page, ticket.token, result)
    }
}
