//! TUI application: main loop
//!
//! ```text
//! TuiApp (select! loop)
//!   ├─ crossterm EventStream   keys, mouse presses, wheel
//!   ├─ redraw_rx               transcript changes from the store
//!   ├─ tasks.join_next()       in-flight chat / review requests
//!   └─ tick_interval
//! ```
//!
//! Requests run on a `JoinSet` so the loop keeps drawing while a reply is
//! outstanding. Results reach the screen through the [`SessionStore`].

use super::feedback_overlay::FeedbackOverlay;
use super::interaction::{Interaction, InteractionHub};
use super::keymap::{KeyAction, handle_key_event};
use super::scroll_sync::ScrollSync;
use super::state::TuiState;
use super::widgets::{
    MainLayout, conversation::ConversationWidget, feedback::FeedbackWidget, header::HeaderWidget,
    input::InputWidget, status_bar::StatusBarWidget,
};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use empower_application::{
    ChatGateway, FeedbackController, RequestCoordinator, ReviewGateway, SessionStore,
    TranscriptChange, TranscriptObserver,
};
use futures::{FutureExt, stream::StreamExt};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

const WHEEL_LINES: u16 = 3;

/// How long quitting waits for in-flight requests before aborting them.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Wakes the main loop whenever the transcript changes.
struct RedrawNotifier {
    tx: mpsc::UnboundedSender<()>,
}

impl TranscriptObserver for RedrawNotifier {
    fn on_change(&self, _change: &TranscriptChange) {
        let _ = self.tx.send(());
    }
}

pub struct TuiApp<C: ChatGateway + 'static, R: ReviewGateway + 'static> {
    store: SessionStore,
    coordinator: Arc<RequestCoordinator<C>>,
    feedback: FeedbackOverlay<R>,
    hub: Arc<InteractionHub>,
    scroll: Arc<ScrollSync>,
    redraw_rx: mpsc::UnboundedReceiver<()>,
    tasks: JoinSet<()>,
    state: TuiState,
    base_url: String,
    tick: Duration,
    page_height: u16,
}

impl<C: ChatGateway + 'static, R: ReviewGateway + 'static> TuiApp<C, R> {
    /// Both collaborators must share the same [`SessionStore`].
    pub fn new(
        coordinator: Arc<RequestCoordinator<C>>,
        controller: Arc<FeedbackController<R>>,
    ) -> Self {
        let store = coordinator.store().clone();
        let (redraw_tx, redraw_rx) = mpsc::unbounded_channel();
        store.subscribe(Arc::new(RedrawNotifier { tx: redraw_tx }));
        let scroll = ScrollSync::attach(&store);
        let hub = InteractionHub::new();

        Self {
            store,
            coordinator,
            feedback: FeedbackOverlay::new(controller, Arc::clone(&hub)),
            hub,
            scroll,
            redraw_rx,
            tasks: JoinSet::new(),
            state: TuiState::new(),
            base_url: String::new(),
            tick: Duration::from_millis(250),
            page_height: 10,
        }
    }

    /// Endpoint shown in the header.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(info);
        }));

        let mut event_stream = EventStream::new();
        let mut tick = tokio::time::interval(self.tick);

        let result = loop {
            self.feedback.sync();

            let mut page_height = self.page_height;
            if let Err(e) = terminal.draw(|frame| {
                page_height = self.render(frame);
            }) {
                break Err(e);
            }
            self.page_height = page_height;

            if self.state.should_quit {
                break Ok(());
            }

            tokio::select! {
                // Terminal events (keyboard, mouse, resize)
                Some(Ok(term_event)) = event_stream.next() => {
                    self.handle_terminal_event(term_event);
                }

                // Transcript changed; redraw on the next iteration
                Some(()) = self.redraw_rx.recv() => {}

                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            warn!("Request task panicked: {}", e);
                        }
                    }
                }

                _ = tick.tick() => {}
            }
        };

        self.shutdown(SHUTDOWN_GRACE).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Let in-flight requests finish for up to `grace`, then abort the rest.
    ///
    /// An aborted review still records itself as failed in the conversation
    /// log when its future is dropped.
    async fn shutdown(&mut self, grace: Duration) {
        if self.tasks.is_empty() {
            return;
        }
        let tasks = &mut self.tasks;
        let drained = tokio::time::timeout(grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(
                "Aborting {} in-flight request(s) on exit",
                self.tasks.len()
            );
            self.tasks.abort_all();
            while self.tasks.join_next().await.is_some() {}
        }
    }

    /// Render all widgets, returning the conversation viewport height.
    fn render(&self, frame: &mut ratatui::Frame) -> u16 {
        let layout = MainLayout::compute(frame.area());
        let transcript = self.store.transcript();
        let pending = self.store.is_pending();
        let feedback_open = self.feedback.is_open();

        frame.render_widget(HeaderWidget::new(&self.base_url, pending), layout.header);
        frame.render_widget(
            ConversationWidget::new(&transcript, pending, &self.scroll),
            layout.conversation,
        );

        let input = InputWidget::new(&self.state, pending);
        if !pending && !feedback_open {
            frame.set_cursor_position(input.cursor_position(layout.input));
        }
        frame.render_widget(input, layout.input);
        frame.render_widget(
            StatusBarWidget::new(pending, feedback_open),
            layout.status_bar,
        );

        if feedback_open {
            let overlay = MainLayout::centered_overlay(50, 30, frame.area());
            self.feedback.set_region(overlay);
            frame.render_widget(FeedbackWidget, overlay);
        }

        layout.conversation.height.saturating_sub(2)
    }

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                let action = handle_key_event(self.feedback.is_open(), key);
                self.apply_action(action);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(_) => {
                self.hub.dispatch(&Interaction::at(mouse.column, mouse.row));
                self.feedback.sync();
            }
            MouseEventKind::ScrollUp => self.scroll.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown => self.scroll.scroll_down(WHEEL_LINES),
            _ => {}
        }
    }

    fn apply_action(&mut self, action: KeyAction) {
        // The input is read-only while a reply is outstanding.
        let editable = !self.store.is_pending();

        match action {
            KeyAction::Quit => self.state.should_quit = true,
            KeyAction::InsertChar(c) if editable => self.state.insert_char(c),
            KeyAction::DeleteChar if editable => self.state.delete_char(),
            KeyAction::CursorLeft if editable => self.state.cursor_left(),
            KeyAction::CursorRight if editable => self.state.cursor_right(),
            KeyAction::CursorHome if editable => self.state.cursor_home(),
            KeyAction::CursorEnd if editable => self.state.cursor_end(),
            KeyAction::Submit => self.submit(),
            KeyAction::ScrollUp => self.scroll.scroll_up(1),
            KeyAction::ScrollDown => self.scroll.scroll_down(1),
            KeyAction::PageUp => self.scroll.scroll_up(self.page_height.max(1)),
            KeyAction::PageDown => self.scroll.scroll_down(self.page_height.max(1)),
            KeyAction::OpenFeedback => self.feedback.open(),
            KeyAction::Rate(rating) => {
                debug!("Rating conversation as {}", rating);
                self.state.clear_input();
                let submission = self.feedback.choose(rating);
                self.tasks.spawn(submission.map(|_| ()));
            }
            KeyAction::DismissOverlay => self.feedback.dismiss(),
            _ => {}
        }
    }

    fn submit(&mut self) {
        if !self.state.can_send(self.store.is_pending()) {
            return;
        }
        let text = self.state.take_input();
        let coordinator = Arc::clone(&self.coordinator);
        self.tasks.spawn(async move {
            let outcome = coordinator.submit_turn(&text).await;
            debug!("Turn finished: {:?}", outcome);
        });
    }
}
