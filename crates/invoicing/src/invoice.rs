use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use facturation_core::{
    ClientId, DomainError, DomainResult, Entity, InvoiceId, InvoiceLineId, Money, TaxRate,
};

use crate::reference::InvoiceReference;

/// Calendar month an invoice bills for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InvoicePeriod {
    pub year: i32,
    pub month: u32,
}

impl InvoicePeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl core::fmt::Display for InvoicePeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Invoice status lifecycle (as far as billing runs are concerned).
///
/// An invoice is written as a draft, receives its lines, then is issued. A draft
/// left behind means the run failed half-way for that client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Issued,
}

/// Invoice line, usually one group of identical prestations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub id: InvoiceLineId,
    pub line_no: u32,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

impl InvoiceLine {
    pub fn total_ht(&self) -> DomainResult<Money> {
        self.unit_price.times(self.quantity)
    }
}

/// Invoice header to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub reference: InvoiceReference,
    pub client_id: ClientId,
    pub period: InvoicePeriod,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Payment conditions printed on the invoice.
    pub payment_terms: String,
    pub subject: String,
    pub subtotal_ht: Money,
    pub total_tax: Money,
    pub total_ttc: Money,
}

impl NewInvoice {
    pub fn validate(&self) -> DomainResult<()> {
        if self.subtotal_ht.cents() < 0 || self.total_tax.cents() < 0 {
            return Err(DomainError::validation("invoice amounts cannot be negative"));
        }
        if self.subtotal_ht.checked_add(self.total_tax)? != self.total_ttc {
            return Err(DomainError::invariant(
                "invoice total must equal subtotal plus tax",
            ));
        }
        if self.due_date < self.issue_date {
            return Err(DomainError::validation("due date cannot precede issue date"));
        }
        Ok(())
    }
}

/// Invoice line to append to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoiceLine {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

/// Persisted invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub reference: InvoiceReference,
    pub client_id: ClientId,
    pub period: InvoicePeriod,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_terms: String,
    pub subject: String,
    pub status: InvoiceStatus,
    pub subtotal_ht: Money,
    pub total_tax: Money,
    pub total_ttc: Money,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Create a draft invoice from a validated header.
    pub fn draft(id: InvoiceId, new: NewInvoice) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id,
            reference: new.reference,
            client_id: new.client_id,
            period: new.period,
            issue_date: new.issue_date,
            due_date: new.due_date,
            payment_terms: new.payment_terms,
            subject: new.subject,
            status: InvoiceStatus::Draft,
            subtotal_ht: new.subtotal_ht,
            total_tax: new.total_tax,
            total_ttc: new.total_ttc,
            lines: Vec::new(),
        })
    }

    pub fn is_issued(&self) -> bool {
        self.status == InvoiceStatus::Issued
    }

    /// Sum of `unit price × quantity` over all lines.
    ///
    /// May differ from `subtotal_ht` by the unit-price rounding of grouped lines.
    pub fn lines_total_ht(&self) -> DomainResult<Money> {
        self.lines
            .iter()
            .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.total_ht()?))
    }

    /// Append a line to a draft; line numbers are assigned sequentially from 1.
    pub fn push_line(&mut self, id: InvoiceLineId, line: NewInvoiceLine) -> DomainResult<&InvoiceLine> {
        if self.status != InvoiceStatus::Draft {
            return Err(DomainError::invariant("cannot add lines to an issued invoice"));
        }
        if line.quantity == 0 {
            return Err(DomainError::validation(
                "invoice line quantity must be positive",
            ));
        }
        if line.unit_price.cents() < 0 {
            return Err(DomainError::validation(
                "invoice line unit_price cannot be negative",
            ));
        }
        line.unit_price.times(line.quantity)?;
        if line.description.trim().is_empty() {
            return Err(DomainError::validation("invoice line description is required"));
        }

        let line_no = u32::try_from(self.lines.len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| DomainError::invariant("too many invoice lines"))?;
        self.lines.push(InvoiceLine {
            id,
            line_no,
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price,
            tax_rate: line.tax_rate,
        });
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Draft → Issued.
    pub fn issue(&mut self) -> DomainResult<()> {
        if self.status == InvoiceStatus::Issued {
            return Err(DomainError::conflict("invoice is already issued"));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation("cannot issue invoice without lines"));
        }
        self.status = InvoiceStatus::Issued;
        Ok(())
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
