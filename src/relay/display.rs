//! Host-side error surface state.

use super::ErrorBatch;

/// What the host's error container currently shows.
///
/// Hidden by default. A batch replaces all previous blocks; a new render
/// clears and hides it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDisplay {
    visible: bool,
    blocks: Vec<String>,
}

impl ErrorDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed blocks with `batch`, one block per message.
    pub fn show(&mut self, batch: &ErrorBatch) {
        self.blocks.clear();
        self.blocks.extend(batch.messages().iter().cloned());
        self.visible = true;
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(messages: &[&str]) -> ErrorBatch {
        ErrorBatch::new(messages.iter().map(|m| m.to_string()).collect())
    }

    #[test]
    fn test_hidden_by_default() {
        let display = ErrorDisplay::new();
        assert!(!display.is_visible());
        assert!(display.blocks().is_empty());
    }

    #[test]
    fn test_batch_of_n_gives_n_blocks_in_order() {
        let mut display = ErrorDisplay::new();
        display.show(&batch(&["old"]));

        display.show(&batch(&["first", "second", "third"]));

        assert!(display.is_visible());
        assert_eq!(display.blocks(), ["first", "second", "third"]);
    }

    #[test]
    fn test_clear_hides() {
        let mut display = ErrorDisplay::new();
        display.show(&batch(&["X is not defined"]));
        display.clear();

        assert!(!display.is_visible());
        assert!(display.blocks().is_empty());
    }
}
