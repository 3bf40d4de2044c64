//! Collapsing identical prestations into invoice lines.

use std::collections::HashMap;

use facturation_core::{DomainResult, Money, TaxRate};
use facturation_invoicing::NewInvoiceLine;

use crate::classify::PricingMode;
use crate::pricing::PricedPrestation;

/// Prestations sharing (service, subject, mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGroup {
    pub service: String,
    pub subject: String,
    pub mode: PricingMode,
    pub quantity: u32,
    pub total_ht: Money,
}

impl LineGroup {
    /// "<service> - <subject> (<horaire|forfait>)".
    pub fn description(&self) -> String {
        format!(
            "{} - {} ({})",
            self.service,
            self.subject,
            self.mode.invoice_label()
        )
    }

    /// Group HT split across its quantity, rounded half-up.
    ///
    /// `unit_price × quantity` may miss `total_ht` by less than one cent per unit.
    pub fn unit_price(&self) -> Money {
        self.total_ht.per_unit(self.quantity).unwrap_or(Money::ZERO)
    }

    pub fn to_invoice_line(&self, tax_rate: TaxRate) -> NewInvoiceLine {
        NewInvoiceLine {
            description: self.description(),
            quantity: self.quantity,
            unit_price: self.unit_price(),
            tax_rate,
        }
    }
}

/// Group a client's prestations, keeping groups in first-seen order.
pub fn group_prestations(prestations: &[PricedPrestation]) -> DomainResult<Vec<LineGroup>> {
    let mut groups: Vec<LineGroup> = Vec::new();
    let mut index: HashMap<(&str, &str, PricingMode), usize> = HashMap::new();

    for p in prestations {
        let slot = *index.entry(p.group_key()).or_insert_with(|| {
            groups.push(LineGroup {
                service: p.service.clone(),
                subject: p.subject.clone(),
                mode: p.mode,
                quantity: 0,
                total_ht: Money::ZERO,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.quantity += 1;
        group.total_ht = group.total_ht.checked_add(p.ht)?;
    }
    Ok(groups)
}
