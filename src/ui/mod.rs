//! User-interaction ports
//!
//! Channel management talks to the user only through [`Prompter`], so
//! the same flows run against a terminal or a scripted test double.

pub mod manage;
pub mod terminal;

pub use manage::ChannelManager;
pub use terminal::TerminalPrompter;

/// Result of a prompt the user may back out of
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    Cancelled,
    Value(T),
}

impl<T> Answer<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Answer::Cancelled => None,
            Answer::Value(value) => Some(value),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Answer::Cancelled)
    }
}

/// Accepted characters for free-text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Numeric,
    Text,
}

/// Synchronous dialogs used by the channel management flows
pub trait Prompter {
    /// Pick one option by index
    fn select(&mut self, heading: &str, options: &[String]) -> Answer<usize>;

    /// Pick any number of options by index
    fn multi_select(&mut self, heading: &str, options: &[String]) -> Answer<Vec<usize>>;

    /// Free input; an empty answer falls back to `default` when given
    fn input(&mut self, prompt: &str, default: Option<&str>, kind: InputKind) -> Answer<String>;

    /// Yes/no question
    fn confirm(&mut self, heading: &str, message: &str) -> Answer<bool>;

    /// Blocking informational message
    fn notify(&mut self, message: &str);

    /// Show a block of text
    fn text_viewer(&mut self, heading: &str, text: &str);

    /// Open a progress display
    fn progress(&mut self, heading: &str, message: &str) -> Box<dyn Progress + '_>;
}

/// Percentage progress display
pub trait Progress {
    fn update(&mut self, percent: u8, message: &str);

    fn close(&mut self) {}
}

/// Progress sink that only logs, for non-interactive runs
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Progress for LogProgress {
    fn update(&mut self, percent: u8, message: &str) {
        log::debug!("[{}] {:>3}% {}", self.label, percent, message);
    }
}

/// `done` out of `total` as a whole percentage, clamped to 100
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}
