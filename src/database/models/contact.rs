use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of counterpart an anagrafica describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tipo_soggetto", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TipoSoggetto {
    Privato,
    Azienda,
    PubblicaAmministrazione,
    Condominio,
}

/// Lifecycle status of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contact_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Attivo,
    InAttesa,
    Blacklist,
}

/// CRM record (anagrafica) for a business counterpart: customer or
/// supplier, with Italian fiscal and e-invoicing identifiers.
///
/// Uniqueness of (email, tenant_id) and (codice_fiscale, tenant_id) is
/// enforced by the database, scoped per tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub tipo_soggetto: TipoSoggetto,
    pub is_fornitore: bool,
    pub ragione_sociale: Option<String>,
    pub nome: Option<String>,
    pub cognome: Option<String>,
    pub codice_fiscale: String,
    pub partita_iva: Option<String>,
    pub codice_destinatario_sdi: Option<String>,
    pub codice_univoco_ipa: Option<String>,
    pub pec: Option<String>,
    pub email: String,
    pub telefono: Option<String>,
    pub cellulare: Option<String>,
    pub via: String,
    pub numero_civico: Option<String>,
    pub cap: String,
    pub citta: String,
    pub provincia: String,
    pub nazione: String,
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
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_serialize_to_snake_case() {
        assert_eq!(
            serde_json::to_value(TipoSoggetto::PubblicaAmministrazione).unwrap(),
            "pubblica_amministrazione"
        );
        assert_eq!(serde_json::to_value(ContactStatus::InAttesa).unwrap(), "in_attesa");
    }

    #[test]
    fn unknown_enum_value_fails_deserialization() {
        assert!(serde_json::from_value::<TipoSoggetto>(serde_json::json!("societa")).is_err());
        assert!(serde_json::from_value::<ContactStatus>(serde_json::json!("sospeso")).is_err());
    }
}
