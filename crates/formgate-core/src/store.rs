//! Per-session form ownership: create, update, validate, submit

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::form::{Form, FormStatus};

/// Failures surfaced by store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("No active form")]
    NoActiveForm,
    #[error("Form not found")]
    FormNotFound,
    #[error("Field '{0}' not found")]
    UnknownField(String),
}

/// Whether a successfully submitted form stays addressable as the
/// current form, or the pointer is dropped so further updates require
/// opening a new form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    #[default]
    Retain,
    Clear,
}

/// Result of a submit attempt that reached validation
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Submitted(Form),
    Rejected(Vec<String>),
}

/// Owns every form created during one session and the notion of the
/// "current" form implicitly targeted by updates and submits.
///
/// One store per session; stores are never shared across sessions.
pub struct FormStore {
    forms: HashMap<String, Form>,
    current_form: Option<String>,
    submit_policy: SubmitPolicy,
}

impl FormStore {
    pub fn new() -> Self {
        Self::with_policy(SubmitPolicy::default())
    }

    pub fn with_policy(submit_policy: SubmitPolicy) -> Self {
        Self {
            forms: HashMap::new(),
            current_form: None,
            submit_policy,
        }
    }

    /// Create a fresh form and make it current. The prior current form
    /// stays in the store but is no longer addressable.
    pub fn create_form(&mut self, form_type: &str) -> Form {
        let id = self.next_form_id();
        let form = Form::new(id.clone(), form_type.to_string(), Utc::now());
        debug!(form_id = %id, form_type, "created form");
        self.forms.insert(id.clone(), form.clone());
        self.current_form = Some(id);
        form
    }

    // Time-derived id; same-second creations get a numeric tie-break
    // suffix so ids stay unique within the store.
    fn next_form_id(&self) -> String {
        let base = format!("form_{}", Utc::now().format("%Y%m%d_%H%M%S"));
        if !self.forms.contains_key(&base) {
            return base;
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{}_{}", base, n);
            if !self.forms.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn current_mut(&mut self) -> Result<&mut Form, FormError> {
        let id = self.current_form.as_ref().ok_or(FormError::NoActiveForm)?;
        self.forms.get_mut(id).ok_or(FormError::FormNotFound)
    }

    /// Set a field's value on the current form. Empty string is a legal
    /// value; the field set itself never changes.
    pub fn update_field(&mut self, field_name: &str, value: &str) -> Result<Form, FormError> {
        let form = self.current_mut()?;
        let field = form
            .fields
            .get_mut(field_name)
            .ok_or_else(|| FormError::UnknownField(field_name.to_string()))?;
        field.value = value.to_string();
        form.updated_at = Some(Utc::now());
        debug!(form_id = %form.id, field = field_name, "updated field");
        Ok(form.clone())
    }

    /// Validate and submit the current form.
    ///
    /// Validation walks every field and accumulates all violations in
    /// schema order; a rejected form is left active and resubmittable.
    pub fn submit_form(&mut self) -> Result<SubmitOutcome, FormError> {
        let policy = self.submit_policy;
        let form = self.current_mut()?;

        let errors: Vec<String> = form
            .fields
            .iter()
            .filter(|(_, field)| field.required && field.value.is_empty())
            .map(|(name, _)| format!("{} is required", name))
            .collect();
        if !errors.is_empty() {
            debug!(form_id = %form.id, violations = errors.len(), "submit rejected");
            return Ok(SubmitOutcome::Rejected(errors));
        }

        form.status = FormStatus::Submitted;
        if form.submitted_at.is_none() {
            form.submitted_at = Some(Utc::now());
        }
        let snapshot = form.clone();
        debug!(form_id = %snapshot.id, "form submitted");
        if policy == SubmitPolicy::Clear {
            self.current_form = None;
        }
        Ok(SubmitOutcome::Submitted(snapshot))
    }

    /// The current form, if any. Pure read.
    pub fn current_form(&self) -> Option<&Form> {
        self.current_form.as_ref().and_then(|id| self.forms.get(id))
    }

    /// Drop the current-form pointer. The form itself stays in the store.
    pub fn clear_current_form(&mut self) {
        self.current_form = None;
    }

    /// Whether this store holds a form with the given id
    pub fn contains_form(&self, form_id: &str) -> bool {
        self.forms.contains_key(form_id)
    }

    /// Number of forms created during this session
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}
