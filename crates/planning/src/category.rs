use core::str::FromStr;

use serde::{Deserialize, Serialize};

use facturation_core::DomainError;

/// Event type of a schedule entry.
///
/// Serialized with the labels the scheduling screens display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Absence,
    Annulation,
    #[serde(rename = "Congé")]
    Conge,
    Divers,
    Formation,
    Intervention,
    Maladie,
    #[serde(rename = "Rappel téléphonique")]
    RappelTelephonique,
    #[serde(rename = "RDV privé")]
    RdvPrive,
    #[serde(rename = "Réunion")]
    Reunion,
    #[serde(rename = "RTT")]
    Rtt,
    #[serde(rename = "Visite médicale")]
    VisiteMedicale,
}

impl EventCategory {
    pub const ALL: [EventCategory; 12] = [
        EventCategory::Absence,
        EventCategory::Annulation,
        EventCategory::Conge,
        EventCategory::Divers,
        EventCategory::Formation,
        EventCategory::Intervention,
        EventCategory::Maladie,
        EventCategory::RappelTelephonique,
        EventCategory::RdvPrive,
        EventCategory::Reunion,
        EventCategory::Rtt,
        EventCategory::VisiteMedicale,
    ];

    /// Categories that describe work done for a client.
    pub const BILLABLE_DEFAULT: [EventCategory; 3] = [
        EventCategory::Intervention,
        EventCategory::Formation,
        EventCategory::Divers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Absence => "Absence",
            EventCategory::Annulation => "Annulation",
            EventCategory::Conge => "Congé",
            EventCategory::Divers => "Divers",
            EventCategory::Formation => "Formation",
            EventCategory::Intervention => "Intervention",
            EventCategory::Maladie => "Maladie",
            EventCategory::RappelTelephonique => "Rappel téléphonique",
            EventCategory::RdvPrive => "RDV privé",
            EventCategory::Reunion => "Réunion",
            EventCategory::Rtt => "RTT",
            EventCategory::VisiteMedicale => "Visite médicale",
        }
    }
}

impl core::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EventCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("unknown event category: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for c in EventCategory::ALL {
            assert_eq!(c.label().parse::<EventCategory>().unwrap(), c);
        }
    }

    #[test]
    fn parse_ignores_ascii_case_and_whitespace() {
        assert_eq!(
            " intervention ".parse::<EventCategory>().unwrap(),
            EventCategory::Intervention
        );
        assert!("Vacances".parse::<EventCategory>().is_err());
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&EventCategory::RdvPrive).unwrap();
        assert_eq!(json, "\"RDV privé\"");
        let back: EventCategory = serde_json::from_str("\"Congé\"").unwrap();
        assert_eq!(back, EventCategory::Conge);
    }
}
