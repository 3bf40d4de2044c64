use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use facturation_billing::{BillingRequest, BillingRunResult, ClientBilling, PricedPrestation};
use facturation_clients::{Client, ClientKind, ContactInfo};
use facturation_core::{ClientId, DomainError, DomainResult, Money, ScheduleEntryId};
use facturation_invoicing::Invoice;
use facturation_planning::{EventCategory, ScheduleEntry};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Body of both preview and commit.
#[derive(Debug, Deserialize)]
pub struct BillingRunRequest {
    pub month: i64,
    pub year: i64,
    #[serde(default)]
    pub client_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub kind: ClientKind,
    pub civility: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organisation_name: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}

/// Amounts are decimal currency units (`45.5`), times are `HH:MM`.
#[derive(Debug, Deserialize)]
pub struct CreateScheduleEntryRequest {
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub client_id: Option<String>,
    pub category: String,
    pub service: Option<String>,
    pub subject: Option<String>,
    pub hourly_rate: Option<f64>,
    pub flat_fee: Option<f64>,
}

impl BillingRunRequest {
    /// Month and year outside the integer ranges the engine accepts are reported as
    /// an invalid period; the engine checks the calendar bounds.
    pub fn into_request(self) -> Result<BillingRequest, axum::response::Response> {
        let (Ok(month), Ok(year)) = (u32::try_from(self.month), i32::try_from(self.year)) else {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_period",
                format!("invalid billing period: month {}, year {}", self.month, self.year),
            ));
        };
        let client_ids = match self.client_ids {
            None => None,
            Some(ids) => Some(
                ids.iter()
                    .map(|s| s.parse::<ClientId>())
                    .collect::<DomainResult<Vec<_>>>()
                    .map_err(|_| {
                        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid client id")
                    })?,
            ),
        };
        Ok(BillingRequest {
            month,
            year,
            client_ids,
        })
    }
}

impl CreateClientRequest {
    pub fn into_client(self) -> DomainResult<Client> {
        let id = ClientId::new();
        let client = match self.kind {
            ClientKind::Individual => Client::individual(
                id,
                self.first_name.unwrap_or_default(),
                self.last_name.unwrap_or_default(),
            ),
            ClientKind::Organisation => {
                Client::organisation(id, self.organisation_name.unwrap_or_default())
            }
        };
        let client = match self.civility {
            Some(civility) => client.with_civility(civility),
            None => client,
        };
        let client = client.with_contact(self.contact);
        client.validate()?;
        Ok(client)
    }
}

impl CreateScheduleEntryRequest {
    pub fn into_entry(self) -> DomainResult<ScheduleEntry> {
        let category: EventCategory = self.category.parse()?;
        let mut entry = ScheduleEntry::new(ScheduleEntryId::new(), self.date, category);

        match (self.start_time.as_deref(), self.end_time.as_deref()) {
            (Some(start), Some(end)) => {
                entry = entry.with_times(parse_time(start)?, parse_time(end)?);
            }
            (None, None) => {}
            _ => {
                return Err(DomainError::validation(
                    "start_time and end_time must be given together",
                ));
            }
        }
        if let Some(minutes) = self.duration_minutes {
            entry = entry.with_duration_minutes(minutes);
        }
        if let Some(client_id) = self.client_id {
            entry = entry.with_client(client_id.parse()?);
        }
        if let Some(service) = self.service {
            entry = entry.with_service(service);
        }
        if let Some(subject) = self.subject {
            entry = entry.with_subject(subject);
        }
        if let Some(rate) = self.hourly_rate {
            entry = entry.with_hourly_rate(non_negative(rate, "hourly_rate")?);
        }
        if let Some(fee) = self.flat_fee {
            entry = entry.with_flat_fee(non_negative(fee, "flat_fee")?);
        }
        Ok(entry)
    }
}

fn parse_time(s: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| DomainError::validation(format!("invalid time of day: {s} (expected HH:MM)")))
}

fn non_negative(amount: f64, field: &str) -> DomainResult<Money> {
    let money = Money::from_decimal(amount)?;
    if money.cents() < 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(money)
}

// -------------------------
// Response mapping helpers
// -------------------------

fn money(m: Money) -> serde_json::Value {
    json!(m.to_decimal())
}

pub fn prestation_to_json(p: &PricedPrestation) -> serde_json::Value {
    json!({
        "entry_id": p.entry_id.to_string(),
        "date": p.date.to_string(),
        "service": p.service,
        "subject": p.subject,
        "mode": p.mode.as_str(),
        "hourly_rate": p.hourly_rate.map(money),
        "flat_fee": p.flat_fee.map(money),
        "duration_hours": p.hours(),
        "total_ht": money(p.ht),
        "total_tax": money(p.tax),
        "total_ttc": money(p.ttc),
    })
}

pub fn client_billing_to_json(c: &ClientBilling) -> serde_json::Value {
    json!({
        "client_id": c.client_id.to_string(),
        "client_name": c.client_name,
        "prestations": c.prestations.iter().map(prestation_to_json).collect::<Vec<_>>(),
        "total_ht": money(c.totals.ht),
        "total_tax": money(c.totals.tax),
        "total_ttc": money(c.totals.ttc),
        "hours": c.hours(),
        "flat_count": c.flat_count,
    })
}

pub fn billing_run_to_json(r: &BillingRunResult) -> serde_json::Value {
    json!({
        "month": r.month,
        "year": r.year,
        "month_name": r.month_name,
        "client_count": r.client_count,
        "prestation_count": r.prestation_count,
        "total_ht": money(r.totals.ht),
        "total_tax": money(r.totals.tax),
        "total_ttc": money(r.totals.ttc),
        "clients": r.clients.iter().map(client_billing_to_json).collect::<Vec<_>>(),
    })
}

/// Preview shape plus what the commit wrote.
pub fn billing_commit_to_json(r: &BillingRunResult) -> serde_json::Value {
    let mut body = billing_run_to_json(r);
    body["created_invoice_ids"] = json!(
        r.created_invoice_ids()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    );
    body["created_invoices"] = json!(
        r.created_invoices
            .iter()
            .map(|c| json!({
                "id": c.invoice_id.to_string(),
                "reference": c.reference.to_string(),
                "client_id": c.client_id.to_string(),
            }))
            .collect::<Vec<_>>()
    );
    body["skipped_client_ids"] = json!(
        r.skipped_clients
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    );
    body["failed_clients"] = json!(
        r.failed_clients
            .iter()
            .map(|f| json!({
                "client_id": f.client_id.to_string(),
                "client_name": f.client_name,
                "error": f.error,
            }))
            .collect::<Vec<_>>()
    );
    body
}

pub fn client_to_json(c: &Client) -> serde_json::Value {
    json!({
        "id": c.id_typed().to_string(),
        "kind": c.kind(),
        "display_name": c.display_name(),
        "civility": c.civility(),
        "first_name": c.first_name(),
        "last_name": c.last_name(),
        "organisation_name": c.organisation_name(),
        "contact": c.contact(),
    })
}

pub fn schedule_entry_to_json(e: &ScheduleEntry) -> serde_json::Value {
    json!({
        "id": e.id.to_string(),
        "date": e.date.to_string(),
        "start_time": e.start_time.map(|t| t.format("%H:%M").to_string()),
        "end_time": e.end_time.map(|t| t.format("%H:%M").to_string()),
        "duration_minutes": e.worked_minutes(),
        "client_id": e.client_id.map(|id| id.to_string()),
        "category": e.category.label(),
        "service": e.service_label(),
        "subject": e.subject_label(),
        "hourly_rate": e.hourly_rate.map(money),
        "flat_fee": e.flat_fee.map(money),
    })
}

pub fn invoice_to_json(i: Invoice) -> serde_json::Value {
    json!({
        "id": i.id.to_string(),
        "reference": i.reference.to_string(),
        "client_id": i.client_id.to_string(),
        "period": i.period.to_string(),
        "status": i.status,
        "issue_date": i.issue_date.to_string(),
        "due_date": i.due_date.to_string(),
        "payment_terms": i.payment_terms,
        "subject": i.subject,
        "total_ht": money(i.subtotal_ht),
        "total_tax": money(i.total_tax),
        "total_ttc": money(i.total_ttc),
        "lines": i.lines.into_iter().map(|l| json!({
            "line_no": l.line_no,
            "description": l.description,
            "quantity": l.quantity,
            "unit_price": money(l.unit_price),
            "tax_rate": l.tax_rate.percent(),
        })).collect::<Vec<_>>()
    })
}
