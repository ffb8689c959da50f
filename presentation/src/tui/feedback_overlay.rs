//! Feedback prompt overlay
//!
//! Ties the [`FeedbackController`]'s prompt to a [`PanelDismissal`], so the
//! outside-press listener exists exactly while the prompt is shown.

use super::dismissal::PanelDismissal;
use super::interaction::InteractionHub;
use empower_application::{FeedbackController, FeedbackOutcome, ReviewGateway};
use empower_domain::Rating;
use futures::future::{BoxFuture, FutureExt};
use ratatui::layout::Rect;
use std::sync::Arc;
use tracing::debug;

pub struct FeedbackOverlay<R: ReviewGateway + 'static> {
    controller: Arc<FeedbackController<R>>,
    hub: Arc<InteractionHub>,
    dismissal: PanelDismissal,
}

impl<R: ReviewGateway + 'static> FeedbackOverlay<R> {
    pub fn new(controller: Arc<FeedbackController<R>>, hub: Arc<InteractionHub>) -> Self {
        Self {
            controller,
            hub,
            dismissal: PanelDismissal::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_prompt_visible()
    }

    /// Show the prompt and start listening for outside presses.
    pub fn open(&mut self) {
        self.controller.request_feedback();
        let prompt = self.controller.prompt();
        self.dismissal.arm(&self.hub, move || {
            debug!("Feedback prompt dismissed by outside press");
            prompt.hide();
        });
    }

    /// Close without rating.
    pub fn dismiss(&mut self) {
        self.dismissal.disarm();
        self.controller.dismiss();
    }

    /// Close the prompt now and return the submission to run.
    ///
    /// The returned future submits the rating and resets the session.
    pub fn choose(&mut self, rating: Rating) -> BoxFuture<'static, FeedbackOutcome> {
        self.dismissal.disarm();
        self.controller.dismiss();
        let controller = Arc::clone(&self.controller);
        async move { controller.submit(rating).await }.boxed()
    }

    /// Release the listener if the prompt was hidden some other way.
    pub fn sync(&mut self) {
        if !self.is_open() && self.dismissal.is_armed() {
            self.dismissal.disarm();
        }
    }

    /// Record the area the overlay was drawn in.
    pub fn set_region(&self, rect: Rect) {
        self.dismissal.set_region(rect);
    }

    pub fn is_listening(&self) -> bool {
        self.dismissal.is_armed()
    }
}
