use facturation_core::TaxRate;
use facturation_invoicing::DEFAULT_REFERENCE_PREFIX;
use facturation_planning::EventCategory;

/// Billing policy applied by every run of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingConfig {
    /// Single tax rate applied to every prestation and invoice line.
    pub tax_rate: TaxRate,
    pub eligible_categories: Vec<EventCategory>,
    /// Earliest billable year (inclusive).
    pub min_year: i32,
    /// Latest billable year (inclusive).
    pub max_year: i32,
    pub payment_terms_days: u32,
    pub reference_prefix: String,
}

impl BillingConfig {
    pub fn is_eligible(&self, category: EventCategory) -> bool {
        self.eligible_categories.contains(&category)
    }

    /// Payment conditions printed on generated invoices.
    pub fn payment_terms(&self) -> String {
        format!("Paiement sous {} jours", self.payment_terms_days)
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::STANDARD,
            eligible_categories: EventCategory::BILLABLE_DEFAULT.to_vec(),
            min_year: 2020,
            max_year: 9999,
            payment_terms_days: 30,
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
        }
    }
}
