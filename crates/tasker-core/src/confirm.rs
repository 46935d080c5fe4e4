/// A pending mutation waiting for an explicit yes/no.
///
/// The action is only handed to the effect when the answer is yes, so a
/// declined confirmation can never reach the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation<A> {
    message: String,
    action: A,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome<T, E> {
    Declined,
    Done(T),
    Failed(E),
}

impl<T, E> ConfirmOutcome<T, E> {
    pub fn is_done(&self) -> bool {
        matches!(self, ConfirmOutcome::Done(_))
    }
}

impl<A> Confirmation<A> {
    pub fn new(message: impl Into<String>, action: A) -> Self {
        Self {
            message: message.into(),
            action,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn resolve<T, E, F>(self, confirmed: bool, effect: F) -> ConfirmOutcome<T, E>
    where
        F: FnOnce(A) -> Result<T, E>,
    {
        if !confirmed {
            return ConfirmOutcome::Declined;
        }
        match effect(self.action) {
            Ok(v) => ConfirmOutcome::Done(v),
            Err(e) => ConfirmOutcome::Failed(e),
        }
    }
}
