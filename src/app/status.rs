#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press Enter to submit the card.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn submitted(&mut self) {
        self.message = "Card captured".to_string();
    }

    pub fn invalid(&mut self) {
        self.message = "Card details are incomplete or invalid".to_string();
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved card. Press Ctrl+Q again to quit without submitting.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
