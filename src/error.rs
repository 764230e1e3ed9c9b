use std::collections::BTreeMap;

use thiserror::Error;

use crate::form::{Field, FieldError};

/// Why a submission did not reach the results page
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Formularz jest właśnie wysyłany, poczekaj na wynik")]
    Busy,

    #[error("Formularz zawiera błędy ({} pól)", .0.len())]
    Invalid(BTreeMap<Field, FieldError>),

    #[error("Nie udało się uzyskać wyceny: {0:#}")]
    Estimate(#[source] anyhow::Error),

    #[error("Wycena jest gotowa, ale analiza zdjęć nie powiodła się: {0:#}")]
    Upload(#[source] anyhow::Error),
}

impl SubmitError {
    /// Whether the price store was updated before the failure
    pub fn price_stored(&self) -> bool {
        matches!(self, SubmitError::Upload(_))
    }
}
