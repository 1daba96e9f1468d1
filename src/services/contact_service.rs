use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::{is_unique_violation, DatabaseError, DatabaseManager};
use crate::database::models::Contact;
use crate::middleware::AuthUser;
use crate::validation::{validate_payload, ContactPayload, ContactUpdate, ValidationFailure};

const CONTACT_COLUMNS: &str = "id, tenant_id, tipo_soggetto, is_fornitore, ragione_sociale, \
     nome, cognome, codice_fiscale, partita_iva, codice_destinatario_sdi, codice_univoco_ipa, \
     pec, email, telefono, cellulare, via, numero_civico, cap, citta, provincia, nazione, \
     indirizzo_spedizione_diverso, via_spedizione, numero_civico_spedizione, cap_spedizione, \
     citta_spedizione, provincia_spedizione, nazione_spedizione, tipo_cliente, iban, \
     condizioni_pagamento, referente, note, status, created_at, updated_at";

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Validation failed")]
    Validation(ValidationFailure),

    /// Covers both "no such contact" and "contact belongs to another
    /// tenant" - the two must be indistinguishable to the caller.
    #[error("Contact not found")]
    NotFound,

    #[error("Duplicate contact")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<ValidationFailure> for ContactError {
    fn from(err: ValidationFailure) -> Self {
        ContactError::Validation(err)
    }
}

impl From<ContactError> for crate::error::ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation(failure) => failure.into(),
            ContactError::NotFound => crate::error::ApiError::not_found("Contact not found"),
            ContactError::Duplicate => crate::error::ApiError::conflict(
                "A contact with the same email or codice fiscale already exists",
            ),
            ContactError::Database(e) => e.into(),
            ContactError::Sqlx(e) => DatabaseError::Sqlx(e).into(),
        }
    }
}

/// Tenant-scoped CRUD over the contacts table.
///
/// Every query double-filters on the record id AND the caller's tenant
/// id from the session claims; a tenant id arriving in a request body
/// is never trusted.
pub struct ContactService {
    pool: PgPool,
}

impl ContactService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self { pool: DatabaseManager::pool().await? })
    }

    pub async fn create(
        &self,
        caller: &AuthUser,
        payload: ContactPayload,
    ) -> Result<Contact, ContactError> {
        validate_payload(&payload)?;

        let sql = format!(
            "INSERT INTO contacts (tenant_id, tipo_soggetto, is_fornitore, ragione_sociale, \
             nome, cognome, codice_fiscale, partita_iva, codice_destinatario_sdi, \
             codice_univoco_ipa, pec, email, telefono, cellulare, via, numero_civico, cap, \
             citta, provincia, nazione, indirizzo_spedizione_diverso, via_spedizione, \
             numero_civico_spedizione, cap_spedizione, citta_spedizione, provincia_spedizione, \
             nazione_spedizione, tipo_cliente, iban, condizioni_pagamento, referente, note, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, $33) \
             RETURNING {CONTACT_COLUMNS}"
        );

        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(caller.tenant_id)
            .bind(payload.tipo_soggetto)
            .bind(payload.is_fornitore)
            .bind(&payload.ragione_sociale)
            .bind(&payload.nome)
            .bind(&payload.cognome)
            .bind(&payload.codice_fiscale)
            .bind(&payload.partita_iva)
            .bind(&payload.codice_destinatario_sdi)
            .bind(&payload.codice_univoco_ipa)
            .bind(&payload.pec)
            .bind(&payload.email)
            .bind(&payload.telefono)
            .bind(&payload.cellulare)
            .bind(&payload.via)
            .bind(&payload.numero_civico)
            .bind(&payload.cap)
            .bind(&payload.citta)
            .bind(&payload.provincia)
            .bind(&payload.nazione)
            .bind(payload.indirizzo_spedizione_diverso)
            .bind(&payload.via_spedizione)
            .bind(&payload.numero_civico_spedizione)
            .bind(&payload.cap_spedizione)
            .bind(&payload.citta_spedizione)
            .bind(&payload.provincia_spedizione)
            .bind(&payload.nazione_spedizione)
            .bind(&payload.tipo_cliente)
            .bind(&payload.iban)
            .bind(&payload.condizioni_pagamento)
            .bind(&payload.referente)
            .bind(&payload.note)
            .bind(payload.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ContactError::Duplicate
                } else {
                    ContactError::Sqlx(e)
                }
            })?;

        Ok(contact)
    }

    pub async fn find_all(&self, caller: &AuthUser) -> Result<Vec<Contact>, ContactError> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             WHERE tenant_id = $1 ORDER BY created_at DESC"
        );

        let contacts = sqlx::query_as::<_, Contact>(&sql)
            .bind(caller.tenant_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }

    pub async fn find_one(&self, caller: &AuthUser, id: Uuid) -> Result<Contact, ContactError> {
        let sql =
            format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND tenant_id = $2");

        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(caller.tenant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ContactError::NotFound)
    }

    /// Apply a partial update to one contact.
    ///
    /// Only fields present in the payload are written; `updated_at` is
    /// always refreshed. Zero matched rows is a hard not-found, not a
    /// silent success.
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: Uuid,
        update: ContactUpdate,
    ) -> Result<Contact, ContactError> {
        validate_payload(&update)?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE contacts SET updated_at = now()");

        macro_rules! set_if_present {
            ($($field:ident),+ $(,)?) => {
                $(
                    if let Some(value) = update.$field {
                        qb.push(concat!(", ", stringify!($field), " = ")).push_bind(value);
                    }
                )+
            };
        }

        set_if_present!(
            tipo_soggetto,
            is_fornitore,
            ragione_sociale,
            nome,
            cognome,
            codice_fiscale,
            partita_iva,
            codice_destinatario_sdi,
            codice_univoco_ipa,
            pec,
            email,
            telefono,
            cellulare,
            via,
            numero_civico,
            cap,
            citta,
            provincia,
            nazione,
            indirizzo_spedizione_diverso,
            via_spedizione,
            numero_civico_spedizione,
            cap_spedizione,
            citta_spedizione,
            provincia_spedizione,
            nazione_spedizione,
            tipo_cliente,
            iban,
            condizioni_pagamento,
            referente,
            note,
            status,
        );

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND tenant_id = ").push_bind(caller.tenant_id);
        qb.push(" RETURNING ").push(CONTACT_COLUMNS);

        let contact = qb
            .build_query_as::<Contact>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ContactError::Duplicate
                } else {
                    ContactError::Sqlx(e)
                }
            })?
            .ok_or(ContactError::NotFound)?;

        Ok(contact)
    }

    /// Delete one contact, returning the removed row.
    ///
    /// Zero matched rows is a hard not-found, not a silent success.
    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> Result<Contact, ContactError> {
        let sql = format!(
            "DELETE FROM contacts WHERE id = $1 AND tenant_id = $2 RETURNING {CONTACT_COLUMNS}"
        );

        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(caller.tenant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ContactError::NotFound)
    }
}
