use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::text_input::TextInputState;
use crate::tui::modal::ModalForm;

/// A single labelled text field
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub required: bool,
    pub max_length: Option<usize>,
    pub input: TextInputState,
}

impl FormField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            placeholder: String::new(),
            required: false,
            max_length: None,
            input: TextInputState::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Pre-fill with an existing value, cursor at the end
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.input.set_cursor_to_end(&self.value);
        self
    }
}

pub type FormValidator = fn(&FieldForm) -> Result<(), String>;

/// Multi-field input form.
///
/// Tab/Down and Shift-Tab/Up move between fields, Enter advances and submits
/// from the last field, Ctrl+S submits from anywhere. Submission validates
/// required fields and the optional custom validator; a failed validation
/// keeps the form open with an inline error.
#[derive(Debug, Clone)]
pub struct FieldForm {
    title: String,
    fields: Vec<FormField>,
    focus: usize,
    submitted: bool,
    error: Option<String>,
    validator: Option<FormValidator>,
}

impl FieldForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            focus: 0,
            submitted: false,
            error: None,
            validator: None,
        }
    }

    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn validator(mut self, validator: FormValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [FormField] {
        &mut self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Trimmed value of the field at `index` (empty when out of range)
    pub fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.value.trim().to_string())
            .unwrap_or_default()
    }

    fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn submit(&mut self) {
        if let Some(index) = self.fields.iter().position(|f| f.required && f.value.trim().is_empty()) {
            self.error = Some(format!("{} is required", self.fields[index].label));
            self.focus = index;
            return;
        }
        if let Some(validate) = self.validator {
            if let Err(message) = validate(self) {
                self.error = Some(message);
                return;
            }
        }
        self.error = None;
        self.submitted = true;
    }
}

impl ModalForm for FieldForm {
    fn handle_key(&mut self, key: KeyEvent) {
        if self.submitted {
            return;
        }

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Enter => {
                if self.focus + 1 >= self.fields.len() {
                    self.submit();
                } else {
                    self.next_field();
                }
            }
            code => {
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    return;
                }
                if let Some(field) = self.fields.get_mut(self.focus) {
                    if let Some(value) = field.input.handle_key(code, &field.value, field.max_length) {
                        field.value = value;
                        self.error = None;
                    }
                }
            }
        }
    }

    fn is_completed(&self) -> bool {
        self.submitted
    }
}
