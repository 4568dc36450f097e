/// One-line modal editor for typing a matrix
use crossterm::event::KeyCode;
use linviz_core::transform::SINGULAR_EPSILON;
use linviz_core::{format_matrix, parse_matrix, MatrixPublisher, Preset};
use nalgebra::Matrix3;
use tracing::info;

/// Feedback shown under the prompt after an action
#[derive(Debug, Clone, PartialEq)]
pub enum PromptMessage {
    Info(String),
    Warning(String),
    Error(String),
}

/// Collects matrix text and publishes it once it parses.
///
/// Nothing malformed ever reaches the mailbox: parse errors keep the prompt
/// open and are reported through [`MatrixPrompt::message`].
pub struct MatrixPrompt {
    open: bool,
    buffer: String,
    preset: Option<Preset>,
    message: Option<PromptMessage>,
    publisher: MatrixPublisher,
}

impl MatrixPrompt {
    pub fn new(publisher: MatrixPublisher) -> Self {
        Self {
            open: false,
            buffer: String::new(),
            preset: None,
            message: None,
            publisher,
        }
    }

    /// Open with the identity filled in
    pub fn open(&mut self) {
        self.open = true;
        self.buffer = format_matrix(&Matrix3::identity());
        self.preset = None;
        self.message = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn message(&self) -> Option<&PromptMessage> {
        self.message.as_ref()
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.open = false;
                self.message = None;
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.buffer.pop();
                self.preset = None;
            }
            KeyCode::Tab => {
                let next = self.preset.map_or(Preset::Identity, |p| p.next());
                self.buffer = format_matrix(&next.matrix());
                self.preset = Some(next);
                self.message = Some(PromptMessage::Info(format!("Preset: {}", next.name())));
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                self.preset = None;
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        let matrix = match parse_matrix(&self.buffer) {
            Ok(matrix) => matrix,
            Err(e) => {
                self.message = Some(PromptMessage::Error(format!(
                    "Invalid matrix values ({e}). Please enter 9 numbers"
                )));
                return;
            }
        };

        let determinant = matrix.determinant();
        self.message = Some(if determinant.abs() < SINGULAR_EPSILON {
            PromptMessage::Warning(format!(
                "Matrix is not invertible (determinant={determinant:.6}). The transformation will collapse the space"
            ))
        } else {
            PromptMessage::Info("Transformation applied!".to_string())
        });

        info!(determinant, "matrix submitted from prompt");
        self.publisher.publish(matrix);
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linviz_core::MatrixMailbox;
    use std::sync::Arc;

    fn prompt() -> (MatrixPrompt, Arc<MatrixMailbox>) {
        let mailbox = Arc::new(MatrixMailbox::new());
        let prompt = MatrixPrompt::new(MatrixPublisher::new(Arc::clone(&mailbox)));
        (prompt, mailbox)
    }

    fn type_text(prompt: &mut MatrixPrompt, text: &str) {
        for c in text.chars() {
            prompt.handle_key(KeyCode::Char(c));
        }
    }

    fn clear(prompt: &mut MatrixPrompt) {
        while !prompt.buffer().is_empty() {
            prompt.handle_key(KeyCode::Backspace);
        }
    }

    #[test]
    fn test_open_prefills_identity() {
        let (mut prompt, _) = prompt();
        prompt.open();
        assert!(prompt.is_open());
        assert_eq!(parse_matrix(prompt.buffer()).unwrap(), Matrix3::identity());
    }

    #[test]
    fn test_submit_publishes() {
        let (mut prompt, mailbox) = prompt();
        prompt.open();
        clear(&mut prompt);
        type_text(&mut prompt, "2 0 0; 0 2 0; 0 0 2");
        prompt.handle_key(KeyCode::Enter);

        assert!(!prompt.is_open());
        assert_eq!(mailbox.try_take(), Some(Matrix3::from_diagonal_element(2.0)));
        assert_eq!(
            prompt.message(),
            Some(&PromptMessage::Info("Transformation applied!".to_string()))
        );
    }

    #[test]
    fn test_bad_input_stays_open() {
        let (mut prompt, mailbox) = prompt();
        prompt.open();
        clear(&mut prompt);
        type_text(&mut prompt, "1 2 three");
        prompt.handle_key(KeyCode::Enter);

        assert!(prompt.is_open());
        assert!(matches!(prompt.message(), Some(PromptMessage::Error(_))));
        assert!(mailbox.try_take().is_none());
    }

    #[test]
    fn test_singular_warns_but_publishes() {
        let (mut prompt, mailbox) = prompt();
        prompt.open();
        clear(&mut prompt);
        type_text(&mut prompt, "0 0 0 0 1 0 0 0 1");
        prompt.handle_key(KeyCode::Enter);

        assert!(matches!(prompt.message(), Some(PromptMessage::Warning(_))));
        assert!(mailbox.try_take().is_some());
    }

    #[test]
    fn test_tab_cycles_presets() {
        let (mut prompt, mailbox) = prompt();
        prompt.open();
        prompt.handle_key(KeyCode::Tab);
        prompt.handle_key(KeyCode::Tab);
        assert_eq!(parse_matrix(prompt.buffer()).unwrap(), Preset::Scale2x.matrix());

        prompt.handle_key(KeyCode::Enter);
        assert_eq!(mailbox.try_take(), Some(Preset::Scale2x.matrix()));
    }

    #[test]
    fn test_escape_cancels() {
        let (mut prompt, mailbox) = prompt();
        prompt.open();
        prompt.handle_key(KeyCode::Esc);
        assert!(!prompt.is_open());
        assert!(mailbox.try_take().is_none());
    }
}
