//! Request payload types and their validation rules.
//!
//! Every mutating endpoint parses its body into one of these types and
//! runs `validate_payload` before any service call, so a rule violation
//! can never leave a partial write behind.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::database::models::{ContactStatus, TipoSoggetto};

/// A failed validation, reduced to a field-path keyed message map.
#[derive(Debug)]
pub struct ValidationFailure(validator::ValidationErrors);

impl ValidationFailure {
    pub fn into_field_errors(self) -> HashMap<String, String> {
        self.0
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), message)
            })
            .collect()
    }
}

/// Validate a payload, collecting per-field messages on failure.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ValidationFailure> {
    payload.validate().map_err(ValidationFailure)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub tenant_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Looser than registration on purpose: the password only has to match
/// an existing record, so no minimum length is enforced here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

fn default_nazione() -> String {
    "IT".to_string()
}

fn default_status() -> ContactStatus {
    ContactStatus::Attivo
}

/// PEC is optional, but when present it must be either the empty
/// string or a syntactically valid email address.
fn validate_pec(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("pec").with_message("must be empty or a valid email".into()))
    }
}

/// Full contact payload for create operations. The tenant id is never
/// part of the payload: it comes from the caller's session claims.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub tipo_soggetto: TipoSoggetto,
    #[serde(default)]
    pub is_fornitore: bool,
    pub ragione_sociale: Option<String>,
    pub nome: Option<String>,
    pub cognome: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub codice_fiscale: String,
    pub partita_iva: Option<String>,
    pub codice_destinatario_sdi: Option<String>,
    pub codice_univoco_ipa: Option<String>,
    #[validate(custom(function = validate_pec))]
    pub pec: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    pub telefono: Option<String>,
    pub cellulare: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub via: String,
    pub numero_civico: Option<String>,
    #[validate(length(equal = 5, message = "must be exactly 5 characters"))]
    pub cap: String,
    #[validate(length(min = 1, message = "is required"))]
    pub citta: String,
    #[validate(length(equal = 2, message = "must be exactly 2 characters"))]
    pub provincia: String,
    #[serde(default = "default_nazione")]
    pub nazione: String,
    #[serde(default)]
    pub indirizzo_spedizione_diverso: bool,
    pub via_spedizione: Option<String>,
    pub numero_civico_spedizione: Option<String>,
    pub cap_spedizione: Option<String>,
    pub citta_spedizione: Option<String>,
    pub provincia_spedizione: Option<String>,
    pub nazione_spedizione: Option<String>,
    pub tipo_cliente: Option<String>,
    pub iban: Option<String>,
    pub condizioni_pagamento: Option<String>,
    pub referente: Option<String>,
    pub note: Option<String>,
    #[serde(default = "default_status")]
    pub status: ContactStatus,
}

/// Partial contact payload for update operations: every field is
/// optional, present fields reuse the create-time rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    pub tipo_soggetto: Option<TipoSoggetto>,
    pub is_fornitore: Option<bool>,
    pub ragione_sociale: Option<String>,
    pub nome: Option<String>,
    pub cognome: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub codice_fiscale: Option<String>,
    pub partita_iva: Option<String>,
    pub codice_destinatario_sdi: Option<String>,
    pub codice_univoco_ipa: Option<String>,
    #[validate(custom(function = validate_pec))]
    pub pec: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub cellulare: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub via: Option<String>,
    pub numero_civico: Option<String>,
    #[validate(length(equal = 5, message = "must be exactly 5 characters"))]
    pub cap: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub citta: Option<String>,
    #[validate(length(equal = 2, message = "must be exactly 2 characters"))]
    pub provincia: Option<String>,
    pub nazione: Option<String>,
    pub indirizzo_spedizione_diverso: Option<bool>,
    pub via_spedizione: Option<String>,
    pub numero_civico_spedizione: Option<String>,
    pub cap_spedizione: Option<String>,
    pub citta_spedizione: Option<String>,
    pub provincia_spedizione: Option<String>,
    pub nazione_spedizione: Option<String>,
    pub tipo_cliente: Option<String>,
    pub iban: Option<String>,
    pub condizioni_pagamento: Option<String>,
    pub referente: Option<String>,
    pub note: Option<String>,
    pub status: Option<ContactStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact_json() -> serde_json::Value {
        json!({
            "tipoSoggetto": "azienda",
            "codiceFiscale": "RSSMRA80A01H501U",
            "email": "info@acme.it",
            "via": "Via Roma",
            "cap": "00100",
            "citta": "Roma",
            "provincia": "RM"
        })
    }

    #[test]
    fn register_rules() {
        let ok = RegisterRequest {
            email: "a@b.com".into(),
            password: "longenough".into(),
            tenant_name: "Acme".into(),
            first_name: None,
            last_name: None,
        };
        assert!(validate_payload(&ok).is_ok());

        let short_password = RegisterRequest { password: "short7!".into(), ..ok.clone() };
        let errors = validate_payload(&short_password).unwrap_err().into_field_errors();
        assert!(errors.contains_key("password"));

        let bad_email = RegisterRequest { email: "not-an-email".into(), ..ok.clone() };
        assert!(validate_payload(&bad_email).is_err());

        let short_tenant = RegisterRequest { tenant_name: "ab".into(), ..ok };
        assert!(validate_payload(&short_tenant).is_err());
    }

    #[test]
    fn login_allows_short_password() {
        let login = LoginRequest { email: "a@b.com".into(), password: "x".into() };
        assert!(validate_payload(&login).is_ok());

        let empty = LoginRequest { email: "a@b.com".into(), password: "".into() };
        assert!(validate_payload(&empty).is_err());
    }

    #[test]
    fn contact_defaults_applied() {
        let payload: ContactPayload = serde_json::from_value(contact_json()).unwrap();
        assert!(!payload.is_fornitore);
        assert!(!payload.indirizzo_spedizione_diverso);
        assert_eq!(payload.nazione, "IT");
        assert_eq!(payload.status, ContactStatus::Attivo);
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn cap_must_be_five_characters() {
        let mut value = contact_json();
        value["cap"] = json!("1234");
        let payload: ContactPayload = serde_json::from_value(value).unwrap();
        let errors = validate_payload(&payload).unwrap_err().into_field_errors();
        assert_eq!(errors["cap"], "must be exactly 5 characters");
    }

    #[test]
    fn provincia_must_be_two_characters() {
        let mut value = contact_json();
        value["provincia"] = json!("ROM");
        let payload: ContactPayload = serde_json::from_value(value).unwrap();
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn pec_empty_or_valid() {
        let mut value = contact_json();
        value["pec"] = json!("");
        let payload: ContactPayload = serde_json::from_value(value.clone()).unwrap();
        assert!(validate_payload(&payload).is_ok());

        value["pec"] = json!("acme@pec.it");
        let payload: ContactPayload = serde_json::from_value(value.clone()).unwrap();
        assert!(validate_payload(&payload).is_ok());

        value["pec"] = json!("not-a-pec");
        let payload: ContactPayload = serde_json::from_value(value).unwrap();
        let errors = validate_payload(&payload).unwrap_err().into_field_errors();
        assert_eq!(errors["pec"], "must be empty or a valid email");
    }

    #[test]
    fn update_validates_only_present_fields() {
        let update = ContactUpdate { note: Some("ok".into()), ..Default::default() };
        assert!(validate_payload(&update).is_ok());

        let bad = ContactUpdate { cap: Some("123".into()), ..Default::default() };
        assert!(validate_payload(&bad).is_err());
    }
}
