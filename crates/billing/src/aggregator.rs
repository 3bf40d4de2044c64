//! Per-client accumulation of priced prestations.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use facturation_core::{ClientId, DomainError, DomainResult, Money};

use crate::classify::PricingMode;
use crate::pricing::{PricedPrestation, minutes_to_hours};

/// HT / tax / TTC running totals.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub ht: Money,
    pub tax: Money,
    pub ttc: Money,
}

impl Totals {
    /// Add one prestation; on overflow `self` is left untouched.
    pub fn add(&mut self, prestation: &PricedPrestation) -> DomainResult<()> {
        *self = Totals {
            ht: self.ht.checked_add(prestation.ht)?,
            tax: self.tax.checked_add(prestation.tax)?,
            ttc: self.ttc.checked_add(prestation.ttc)?,
        };
        Ok(())
    }
}

/// Everything one client is billed for in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientBilling {
    pub client_id: ClientId,
    pub client_name: String,
    pub prestations: Vec<PricedPrestation>,
    pub totals: Totals,
    pub hourly_minutes: u64,
    pub flat_count: u32,
}

impl ClientBilling {
    pub fn new(client_id: ClientId, client_name: impl Into<String>) -> Self {
        Self {
            client_id,
            client_name: client_name.into(),
            prestations: Vec::new(),
            totals: Totals::default(),
            hourly_minutes: 0,
            flat_count: 0,
        }
    }

    pub fn push(&mut self, prestation: PricedPrestation) -> DomainResult<()> {
        self.totals.add(&prestation)?;
        match prestation.mode {
            PricingMode::Hourly => self.hourly_minutes += u64::from(prestation.duration_minutes),
            PricingMode::Flat => self.flat_count += 1,
        }
        self.prestations.push(prestation);
        Ok(())
    }

    /// Hourly work in hours, rounded to 2 decimals.
    pub fn hours(&self) -> f64 {
        minutes_to_hours(self.hourly_minutes)
    }
}

/// Result of aggregating one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Sorted by display name, then id.
    pub clients: Vec<ClientBilling>,
    pub totals: Totals,
    pub prestation_count: usize,
}

/// Groups priced prestations by client and keeps the run's grand totals.
#[derive(Debug, Default)]
pub struct ClientAggregator {
    clients: HashMap<ClientId, ClientBilling>,
    totals: Totals,
    prestation_count: usize,
}

impl ClientAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one prestation for `client_id`.
    ///
    /// `resolve_name` is only called the first time a client is seen. A sum leaving
    /// the `Money` range fails the call and records nothing.
    pub fn record<E: From<DomainError>>(
        &mut self,
        client_id: ClientId,
        prestation: PricedPrestation,
        resolve_name: impl FnOnce(ClientId) -> Result<String, E>,
    ) -> Result<(), E> {
        let mut grand = self.totals;
        grand.add(&prestation)?;
        match self.clients.entry(client_id) {
            Entry::Occupied(o) => o.into_mut().push(prestation)?,
            Entry::Vacant(v) => {
                let mut billing = ClientBilling::new(client_id, resolve_name(client_id)?);
                billing.push(prestation)?;
                v.insert(billing);
            }
        }
        self.totals = grand;
        self.prestation_count += 1;
        Ok(())
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn prestation_count(&self) -> usize {
        self.prestation_count
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn finish(self) -> Aggregation {
        let mut clients: Vec<ClientBilling> = self.clients.into_values().collect();
        clients.sort_by(|a, b| {
            a.client_name
                .cmp(&b.client_name)
                .then_with(|| a.client_id.cmp(&b.client_id))
        });
        Aggregation {
            clients,
            totals: self.totals,
            prestation_count: self.prestation_count,
        }
    }
}
