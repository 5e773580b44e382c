//! Form snapshots and the auto-save component

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::store::LocalStore;
use crate::Result;

/// Flat field-name to value record, as written to storage
pub type FormSnapshot = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    Select,
    Hidden,
    Checkbox,
    Radio,
}

impl FieldKind {
    /// Checkable inputs only contribute a value while checked
    fn is_checkable(self) -> bool {
        matches!(self, FieldKind::Checkbox | FieldKind::Radio)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub checked: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
            checked: false,
        }
    }

    pub fn radio(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        Self {
            checked,
            ..Self::new(name, FieldKind::Radio, value)
        }
    }
}

/// Current values of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub id: String,
    pub fields: Vec<FormField>,
}

impl FormState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// First field carrying `name`
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Serialize successful controls into a flat record. Unchecked radio and
    /// checkbox inputs are skipped and a later field overwrites an earlier
    /// one of the same name.
    pub fn snapshot(&self) -> FormSnapshot {
        self.fields
            .iter()
            .filter(|f| !f.kind.is_checkable() || f.checked)
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }
}

/// Writes a form's values to local storage on every input and restores
/// them on the next load.
pub struct AutoSave<S: LocalStore> {
    form_id: String,
    store: S,
}

impl<S: LocalStore> AutoSave<S> {
    pub fn new(form_id: impl Into<String>, store: S) -> Self {
        Self {
            form_id: form_id.into(),
            store,
        }
    }

    /// Storage key of this form's record
    pub fn key(&self) -> String {
        format!("autosave_{}", self.form_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist the form's current values. Called on every input event.
    pub fn record(&mut self, form: &FormState) -> Result<()> {
        let json = serde_json::to_string(&form.snapshot())?;
        self.store.set_item(&self.key(), &json)
    }

    /// The saved record, if any. A corrupt record counts as absent.
    pub fn saved(&self) -> Result<Option<FormSnapshot>> {
        let key = self.key();
        let Some(raw) = self.store.get_item(&key)? else {
            return Ok(None);
        };
        match serde_json::from_str::<FormSnapshot>(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!("Ignoring unreadable auto-save record {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Repopulate `form` from the saved record. Radio fields are left alone
    /// so exclusive choices keep their state. Returns how many fields were
    /// filled in.
    pub fn restore(&self, form: &mut FormState) -> Result<usize> {
        let Some(saved) = self.saved()? else {
            return Ok(0);
        };

        let mut restored = 0;
        for (name, value) in &saved {
            match form.field_mut(name) {
                Some(field) if field.kind != FieldKind::Radio => {
                    field.value = value.clone();
                    restored += 1;
                }
                Some(_) => {}
                None => debug!("Saved field {} no longer on form {}", name, self.form_id),
            }
        }
        debug!("Restored {} field(s) for form {}", restored, self.form_id);
        Ok(restored)
    }

    /// Drop the saved record. Call after a successful submission.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove_item(&self.key())
    }
}
