use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{NaiveDate, NaiveTime};
use facturation_billing::{
    BillingConfig, Classification, ClientAggregator, classify, group_prestations, price,
};
use facturation_core::{ClientId, DomainError, Money, ScheduleEntryId};
use facturation_planning::{EventCategory, ScheduleEntry};

/// A month of mixed entries spread over `clients` clients.
fn month_of_entries(entries: usize, clients: usize) -> Vec<ScheduleEntry> {
    let client_ids: Vec<ClientId> = (0..clients).map(|_| ClientId::new()).collect();
    let services = ["Ménage", "Jardinage", "Repassage"];
    (0..entries)
        .map(|i| {
            let day = (i % 28) as u32 + 1;
            let base = ScheduleEntry::new(
                ScheduleEntryId::new(),
                NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
                EventCategory::BILLABLE_DEFAULT[i % 3],
            )
            .with_client(client_ids[i % clients])
            .with_service(services[i % services.len()]);
            if i % 4 == 0 {
                base.with_flat_fee(Money::from_units(120))
            } else {
                base.with_hourly_rate(Money::from_cents(3_550)).with_times(
                    NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(10, 20, 0).unwrap(),
                )
            }
        })
        .collect()
}

fn aggregate(entries: &[ScheduleEntry], config: &BillingConfig) -> ClientAggregator {
    let mut aggregator = ClientAggregator::new();
    for entry in entries {
        let Some(client_id) = entry.billed_client() else {
            continue;
        };
        if let Classification::Billable {
            mode,
            duration_minutes,
        } = classify(entry, config)
        {
            let prestation = price(entry, mode, duration_minutes, config.tax_rate).unwrap();
            aggregator
                .record(client_id, prestation, |id| Ok::<_, DomainError>(id.to_string()))
                .unwrap();
        }
    }
    aggregator
}

fn bench_aggregation(c: &mut Criterion) {
    let config = BillingConfig::default();
    let mut group = c.benchmark_group("aggregation");

    for size in [100usize, 1_000, 10_000] {
        let entries = month_of_entries(size, 50);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("classify_price_aggregate", size), &entries, |b, entries| {
            b.iter(|| black_box(aggregate(black_box(entries), &config).finish()))
        });
    }
    group.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let config = BillingConfig::default();
    let mut group = c.benchmark_group("grouping");

    for size in [100usize, 1_000] {
        let run = aggregate(&month_of_entries(size, 1), &config).finish();
        let prestations = run.clients[0].prestations.clone();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("group_prestations", size), &prestations, |b, p| {
            b.iter(|| black_box(group_prestations(black_box(p))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregation, bench_grouping);
criterion_main!(benches);
