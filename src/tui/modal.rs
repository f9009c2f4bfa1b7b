//! Uniform cancellation for modal forms.
//!
//! [`CancellableForm`] sits in front of any [`ModalForm`] and intercepts the
//! cancel keys before the form can see them. The wrapper reports one of three
//! outcomes after each key, and `Completed` and `Cancelled` never hold at the
//! same time.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A form that can be driven one key at a time
pub trait ModalForm {
    fn handle_key(&mut self, key: KeyEvent);

    fn is_completed(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    Active,
    Completed,
    Cancelled,
}

impl ModalOutcome {
    /// Whether the host should close the modal
    pub fn should_quit(self) -> bool {
        !matches!(self, ModalOutcome::Active)
    }
}

/// Default cancel keys: Esc, or `q`/`Q` without Ctrl or Alt
pub fn is_cancel_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char(c) => {
            c.eq_ignore_ascii_case(&'q')
                && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        }
        _ => false,
    }
}

pub struct CancellableForm<F> {
    form: F,
    cancelled: bool,
    is_cancel: fn(&KeyEvent) -> bool,
    is_done: fn(&F) -> bool,
}

impl<F: ModalForm> CancellableForm<F> {
    pub fn new(form: F) -> Self {
        Self::with_predicates(form, is_cancel_key, F::is_completed)
    }
}

impl<F> CancellableForm<F> {
    pub fn with_predicates(form: F, is_cancel: fn(&KeyEvent) -> bool, is_done: fn(&F) -> bool) -> Self {
        Self {
            form,
            cancelled: false,
            is_cancel,
            is_done,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn into_inner(self) -> F {
        self.form
    }

    pub fn outcome(&self) -> ModalOutcome {
        if self.cancelled {
            ModalOutcome::Cancelled
        } else if (self.is_done)(&self.form) {
            ModalOutcome::Completed
        } else {
            ModalOutcome::Active
        }
    }
}

impl<F: ModalForm> CancellableForm<F> {
    /// Feed one key. Cancel keys are consumed here and never reach the form.
    pub fn update(&mut self, key: KeyEvent) -> ModalOutcome {
        let outcome = self.outcome();
        if outcome.should_quit() {
            return outcome;
        }

        if (self.is_cancel)(&key) {
            self.cancelled = true;
            return ModalOutcome::Cancelled;
        }

        self.form.handle_key(key);
        self.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every key it receives; completes on Enter
    #[derive(Default)]
    struct Recorder {
        keys: Vec<KeyCode>,
        done: bool,
    }

    impl ModalForm for Recorder {
        fn handle_key(&mut self, key: KeyEvent) {
            self.keys.push(key.code);
            if key.code == KeyCode::Enter {
                self.done = true;
            }
        }

        fn is_completed(&self) -> bool {
            self.done
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cancel_keys_are_not_forwarded() {
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')] {
            let mut modal = CancellableForm::new(Recorder::default());
            assert_eq!(modal.update(key(code)), ModalOutcome::Cancelled);
            assert!(modal.form().keys.is_empty());
            assert!(modal.is_cancelled());
        }
    }

    #[test]
    fn test_other_keys_are_forwarded() {
        let mut modal = CancellableForm::new(Recorder::default());
        assert_eq!(modal.update(key(KeyCode::Char('a'))), ModalOutcome::Active);
        assert_eq!(modal.update(key(KeyCode::Enter)), ModalOutcome::Completed);
        assert_eq!(modal.form().keys, vec![KeyCode::Char('a'), KeyCode::Enter]);
    }

    #[test]
    fn test_ctrl_q_is_not_a_cancel() {
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(!is_cancel_key(&ctrl_q));
        let shift_q = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert!(is_cancel_key(&shift_q));
    }

    #[test]
    fn test_outcome_is_exclusive_and_sticky() {
        let mut modal = CancellableForm::new(Recorder::default());
        modal.update(key(KeyCode::Enter));
        // A cancel key after completion does not flip the outcome
        assert_eq!(modal.update(key(KeyCode::Esc)), ModalOutcome::Completed);
        assert!(!modal.is_cancelled());

        let mut modal = CancellableForm::new(Recorder::default());
        modal.update(key(KeyCode::Esc));
        assert_eq!(modal.update(key(KeyCode::Enter)), ModalOutcome::Cancelled);
        assert!(!modal.form().done);
    }

    #[test]
    fn test_custom_predicates() {
        let mut modal = CancellableForm::with_predicates(
            Recorder::default(),
            |k| k.code == KeyCode::F(10),
            |r| r.keys.len() >= 2,
        );
        assert_eq!(modal.update(key(KeyCode::Esc)), ModalOutcome::Active);
        assert_eq!(modal.update(key(KeyCode::Char('x'))), ModalOutcome::Completed);
        assert_eq!(modal.outcome(), ModalOutcome::Completed);
    }
}
