use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{CreateCommunity, CreateEvent};

/// Outcome of a payload check: either clean, or a field -> message map the
/// HTTP layer can return as-is. Validation never fails itself and touches no
/// external state.
#[derive(Debug)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: HashMap<String, String>,
}

impl ValidationOutcome {
    fn from_errors(errors: HashMap<String, String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    match value {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

fn is_valid_id(value: &str) -> bool {
    Uuid::parse_str(value.trim()).is_ok()
}

pub fn validate_community(payload: &CreateCommunity) -> ValidationOutcome {
    let mut errors = HashMap::new();

    if is_blank(&payload.name) {
        errors.insert("name".to_string(), "name is required".to_string());
    }

    ValidationOutcome::from_errors(errors)
}

/// Checks presence and id syntax only; whether the referenced community
/// actually exists is the caller's job against the persistence collaborator.
pub fn validate_event(payload: &CreateEvent) -> ValidationOutcome {
    let mut errors = HashMap::new();

    if is_blank(&payload.name) {
        errors.insert("name".to_string(), "event name is required".to_string());
    }

    match &payload.community {
        c if is_blank(c) => {
            errors.insert("community".to_string(), "community is required".to_string());
        }
        Some(c) if !is_valid_id(c) => {
            errors.insert(
                "community".to_string(),
                "community should be a valid id".to_string(),
            );
        }
        _ => {}
    }

    if is_blank(&payload.venue) {
        errors.insert("venue".to_string(), "venue is required".to_string());
    }

    if is_blank(&payload.date) {
        errors.insert("date".to_string(), "date is required".to_string());
    }

    match &payload.created_by {
        c if is_blank(c) => {
            errors.insert("createdBy".to_string(), "created by is required".to_string());
        }
        Some(c) if !is_valid_id(c) => {
            errors.insert(
                "createdBy".to_string(),
                "created by should be a valid id".to_string(),
            );
        }
        _ => {}
    }

    ValidationOutcome::from_errors(errors)
}
