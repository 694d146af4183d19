//! Display surface and confirmation capabilities.
//!
//! The controller never talks to a terminal or a page directly. It hands
//! views and notices to a [`Surface`] and asks a [`Confirm`] before
//! destructive actions, so both can be swapped out in tests.

use std::time::Duration;

use serde::Serialize;

use crate::view::GuestbookView;

/// Message shown after a successful add.
pub const THANK_YOU_MESSAGE: &str = "Thank you for signing the guestbook!";

/// Prompt shown before clearing every record.
pub const CLEAR_ALL_PROMPT: &str = "Are you sure you want to delete all visitor data?";

/// Default delay before a notice appears.
pub const DEFAULT_SHOW_DELAY: Duration = Duration::from_millis(100);

/// Default time a notice stays visible.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(3000);

/// Kind of transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// An action succeeded.
    Success,
}

/// A transient notice.
///
/// Timing is descriptive: the surface shows the notice after `show_after`
/// and removes it `dismiss_after` later. It never touches guestbook state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Notice kind.
    pub kind: NoticeKind,
    /// Text to display.
    pub message: String,
    /// Delay before the notice appears.
    pub show_after: Duration,
    /// How long the notice stays visible.
    pub dismiss_after: Duration,
}

impl Notice {
    /// The notice shown after a visitor signs the guestbook.
    #[must_use]
    pub fn thank_you(timing: NoticeTiming) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: THANK_YOU_MESSAGE.to_string(),
            show_after: timing.show_after,
            dismiss_after: timing.dismiss_after,
        }
    }
}

/// Timing applied to notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTiming {
    /// Delay before a notice appears.
    pub show_after: Duration,
    /// How long a notice stays visible.
    pub dismiss_after: Duration,
}

impl Default for NoticeTiming {
    fn default() -> Self {
        Self {
            show_after: DEFAULT_SHOW_DELAY,
            dismiss_after: DEFAULT_DISMISS_AFTER,
        }
    }
}

/// Where the guestbook is displayed.
pub trait Surface {
    /// Replace the list contents with `view`.
    fn replace(&mut self, view: &GuestbookView);

    /// Reset the entry form inputs.
    fn reset_form(&mut self);

    /// Clear the filter input.
    fn clear_filter_input(&mut self);

    /// Show a transient notice.
    fn show_notice(&mut self, notice: &Notice);
}

/// Yes/no decision before a destructive action.
pub trait Confirm {
    /// Ask the user; `true` means proceed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// A confirmation that always answers the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Something a [`RecordingSurface`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// List replaced.
    Replaced(GuestbookView),
    /// Form reset.
    FormReset,
    /// Filter input cleared.
    FilterCleared,
    /// Notice shown.
    Notice(Notice),
}

/// Surface that records every call, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// Events in call order.
    pub events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently displayed view.
    #[must_use]
    pub fn last_view(&self) -> Option<&GuestbookView> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Replaced(view) => Some(view),
            _ => None,
        })
    }

    /// Number of times the list was replaced.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SurfaceEvent::Replaced(_)))
            .count()
    }

    /// Forget recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Surface for RecordingSurface {
    fn replace(&mut self, view: &GuestbookView) {
        self.events.push(SurfaceEvent::Replaced(view.clone()));
    }

    fn reset_form(&mut self) {
        self.events.push(SurfaceEvent::FormReset);
    }

    fn clear_filter_input(&mut self) {
        self.events.push(SurfaceEvent::FilterCleared);
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.events.push(SurfaceEvent::Notice(notice.clone()));
    }
}
