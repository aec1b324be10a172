//! Subject-to-handler dispatch table

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::protocol::{SubjectId, Transfer};

/// Application handler invoked with a completed transfer.
pub type Handler = Box<dyn FnMut(&Transfer) + Send>;

/// Maps subject identifiers to handlers. Built once at startup; adding a
/// subject is a data change, not a control-flow change.
#[derive(Default)]
pub struct HandlerTable {
    handlers: HashMap<SubjectId, Handler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, subject: SubjectId, handler: Handler) -> Result<()> {
        if self.handlers.contains_key(&subject) {
            return Err(Error::DuplicateSubscription(subject.into_u16()));
        }
        self.handlers.insert(subject, handler);
        Ok(())
    }

    /// Route a completed transfer to its subject's handler.
    ///
    /// The transfer is consumed; its payload is dropped exactly once whether
    /// a handler matched or not. Returns whether one did.
    pub fn route(&mut self, transfer: Transfer) -> bool {
        match self.handlers.get_mut(&transfer.subject) {
            Some(handler) => {
                handler(&transfer);
                true
            }
            None => false,
        }
    }
}
