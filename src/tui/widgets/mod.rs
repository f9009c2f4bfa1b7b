pub mod form;
pub mod list;
pub mod text_input;

pub use form::{FieldForm, FormField, FormValidator};
pub use list::ListState;
pub use text_input::TextInputState;
