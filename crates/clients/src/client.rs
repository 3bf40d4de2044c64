use serde::{Deserialize, Serialize};

use facturation_core::{ClientId, DomainError, DomainResult, Entity};

/// Label used when a schedule entry references a client that no longer exists.
pub const UNKNOWN_CLIENT_LABEL: &str = "Client inconnu";

const INDIVIDUAL_FALLBACK: &str = "Client particulier";
const ORGANISATION_FALLBACK: &str = "Organisme professionnel";

/// Client kind: a private individual or an organisation (company, association...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    Individual,
    Organisation,
}

/// Contact information for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A billed party, as read from the client directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    kind: ClientKind,
    civility: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    organisation_name: Option<String>,
    contact: ContactInfo,
}

impl Client {
    pub fn individual(
        id: ClientId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: ClientKind::Individual,
            civility: None,
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            organisation_name: None,
            contact: ContactInfo::default(),
        }
    }

    pub fn organisation(id: ClientId, organisation_name: impl Into<String>) -> Self {
        Self {
            id,
            kind: ClientKind::Organisation,
            civility: None,
            first_name: None,
            last_name: None,
            organisation_name: Some(organisation_name.into()),
            contact: ContactInfo::default(),
        }
    }

    pub fn with_civility(mut self, civility: impl Into<String>) -> Self {
        self.civility = Some(civility.into());
        self
    }

    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = contact;
        self
    }

    pub fn id_typed(&self) -> ClientId {
        self.id
    }

    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    pub fn civility(&self) -> Option<&str> {
        self.civility.as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn organisation_name(&self) -> Option<&str> {
        self.organisation_name.as_deref()
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Name printed on invoices and billing reports.
    ///
    /// Organisations use their organisation name; individuals use
    /// "civility first-name last-name", skipping blank parts.
    pub fn display_name(&self) -> String {
        match self.kind {
            ClientKind::Organisation => non_blank(&self.organisation_name)
                .unwrap_or(ORGANISATION_FALLBACK)
                .to_string(),
            ClientKind::Individual => {
                let parts: Vec<&str> = [&self.civility, &self.first_name, &self.last_name]
                    .into_iter()
                    .filter_map(non_blank)
                    .collect();
                if parts.is_empty() {
                    INDIVIDUAL_FALLBACK.to_string()
                } else {
                    parts.join(" ")
                }
            }
        }
    }

    /// Registration rules: individuals need both names, organisations need a name.
    pub fn validate(&self) -> DomainResult<()> {
        match self.kind {
            ClientKind::Individual => {
                if non_blank(&self.first_name).is_none() || non_blank(&self.last_name).is_none() {
                    return Err(DomainError::validation(
                        "first and last name are required for individual clients",
                    ));
                }
            }
            ClientKind::Organisation => {
                if non_blank(&self.organisation_name).is_none() {
                    return Err(DomainError::validation(
                        "organisation name is required for organisation clients",
                    ));
                }
            }
        }
        if let Some(email) = non_blank(&self.contact.email) {
            if !email.contains('@') {
                return Err(DomainError::validation("invalid email address"));
            }
        }
        Ok(())
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organisation_is_named_after_the_organisation() {
        let client = Client::organisation(ClientId::new(), "ACME Nettoyage");
        assert_eq!(client.display_name(), "ACME Nettoyage");
    }

    #[test]
    fn individual_joins_civility_and_names() {
        let client = Client::individual(ClientId::new(), "Jeanne", "Martin").with_civility("Mme");
        assert_eq!(client.display_name(), "Mme Jeanne Martin");
    }

    #[test]
    fn blank_parts_are_skipped() {
        let client = Client::individual(ClientId::new(), "  ", "Martin");
        assert_eq!(client.display_name(), "Martin");
    }

    #[test]
    fn empty_names_fall_back_to_kind_label() {
        assert_eq!(
            Client::individual(ClientId::new(), "", "").display_name(),
            "Client particulier"
        );
        assert_eq!(
            Client::organisation(ClientId::new(), "").display_name(),
            "Organisme professionnel"
        );
    }

    #[test]
    fn validation_requires_names_per_kind() {
        assert!(Client::individual(ClientId::new(), "Jeanne", "").validate().is_err());
        assert!(Client::organisation(ClientId::new(), " ").validate().is_err());
        assert!(Client::organisation(ClientId::new(), "ACME").validate().is_ok());
    }

    #[test]
    fn validation_rejects_malformed_email() {
        let client = Client::organisation(ClientId::new(), "ACME").with_contact(ContactInfo {
            email: Some("nope".to_string()),
            ..ContactInfo::default()
        });
        match client.validate() {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("email")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
