//! Auto-save of in-progress form data
//!
//! Form values are written to local storage on every input under
//! `autosave_<formId>` and restored on the next load.

mod form;
mod store;

pub use form::{AutoSave, FieldKind, FormField, FormSnapshot, FormState};
pub use store::{FileStore, LocalStore, MemoryStore};
