//! Dashboard statistics aggregation over the customer collection.

use chrono::{DateTime, Datelike, Duration, Utc};
use jia_protocol::Customer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Window treated as "last month" for the new-record count.
const NEW_WINDOW_DAYS: i64 = 30;
/// Length of the monthly growth series.
const GROWTH_SERIES_MONTHS: usize = 6;
/// Company bucket for records without a company value.
const UNKNOWN_COMPANY: &str = "Unknown";

/// Aggregate figures backing the dashboard cards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStats {
    /// Total record count.
    pub total: usize,
    /// Records created in the trailing 30-day window.
    pub new_last_month: usize,
    /// Record counts keyed by company.
    pub per_company: BTreeMap<String, usize>,
    /// Six calendar months of creation counts, oldest first.
    pub monthly_growth: Vec<MonthlyCount>,
    /// New-this-window records over the prior count, as a percentage.
    pub growth_rate_percent: f64,
}

/// One month of the growth series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyCount {
    /// Month label, `YYYY-MM`.
    pub label: String,
    /// Records created in that calendar month.
    pub count: usize,
}

/// Aggregate the collection at a given point in time.
///
/// The growth rate keeps the dashboard's cosmetic convention: with zero
/// prior records it reads 100% when anything was created this window and
/// 0% otherwise.
pub fn aggregate_stats(customers: &[Customer], now: DateTime<Utc>) -> DashboardStats {
    let window_start = now - Duration::days(NEW_WINDOW_DAYS);
    let total = customers.len();
    let new_last_month = customers
        .iter()
        .filter(|customer| customer.created_at > window_start && customer.created_at <= now)
        .count();

    let mut per_company: BTreeMap<String, usize> = BTreeMap::new();
    for customer in customers {
        let company = customer
            .company
            .clone()
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
        *per_company.entry(company).or_default() += 1;
    }

    let monthly_growth = monthly_series(customers, now);

    let prior = total - new_last_month;
    let growth_rate_percent = if prior == 0 {
        if new_last_month > 0 { 100.0 } else { 0.0 }
    } else {
        new_last_month as f64 / prior as f64 * 100.0
    };

    DashboardStats {
        total,
        new_last_month,
        per_company,
        monthly_growth,
        growth_rate_percent,
    }
}

/// Count creations per calendar month for the trailing series.
fn monthly_series(customers: &[Customer], now: DateTime<Utc>) -> Vec<MonthlyCount> {
    let mut months = Vec::with_capacity(GROWTH_SERIES_MONTHS);
    for offset in (0..GROWTH_SERIES_MONTHS).rev() {
        let (year, month) = month_back(now.year(), now.month(), offset as u32);
        let count = customers
            .iter()
            .filter(|customer| {
                customer.created_at.year() == year && customer.created_at.month() == month
            })
            .count();
        months.push(MonthlyCount {
            label: format!("{year:04}-{month:02}"),
            count,
        });
    }
    months
}

/// Step a calendar month backwards by `offset` months.
fn month_back(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 - offset as i32;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::{aggregate_stats, month_back};
    use chrono::{DateTime, TimeZone, Utc};
    use jia_protocol::Customer;
    use pretty_assertions::assert_eq;

    fn customer_at(id: i64, company: Option<&str>, created_at: DateTime<Utc>) -> Customer {
        Customer {
            id,
            name: format!("Customer {id}"),
            company: company.map(str::to_string),
            gst_number: None,
            pan_number: None,
            address: None,
            email_address: None,
            phone_number: None,
            created_at,
        }
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn month_back_crosses_year_boundaries() {
        assert_eq!(month_back(2026, 8, 0), (2026, 8));
        assert_eq!(month_back(2026, 8, 7), (2026, 1));
        assert_eq!(month_back(2026, 2, 3), (2025, 11));
    }

    #[test]
    fn counts_window_and_companies() {
        let now = at(2026, 8, 5);
        let customers = vec![
            customer_at(1, Some("Acme Corp"), at(2026, 8, 1)),
            customer_at(2, Some("Acme Corp"), at(2026, 7, 20)),
            customer_at(3, None, at(2026, 2, 1)),
        ];
        let stats = aggregate_stats(&customers, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.new_last_month, 2);
        assert_eq!(stats.per_company.get("Acme Corp"), Some(&2));
        assert_eq!(stats.per_company.get("Unknown"), Some(&1));
        // 2 new over 1 prior
        assert_eq!(stats.growth_rate_percent, 200.0);
    }

    #[test]
    fn growth_rate_defaults_when_no_prior_records() {
        let now = at(2026, 8, 5);
        let stats = aggregate_stats(&[customer_at(1, None, at(2026, 8, 1))], now);
        assert_eq!(stats.growth_rate_percent, 100.0);

        let stats = aggregate_stats(&[], now);
        assert_eq!(stats.growth_rate_percent, 0.0);
        assert_eq!(stats.new_last_month, 0);
    }

    #[test]
    fn monthly_series_is_six_months_oldest_first() {
        let now = at(2026, 3, 10);
        let customers = vec![
            customer_at(1, None, at(2025, 10, 5)),
            customer_at(2, None, at(2026, 3, 1)),
            customer_at(3, None, at(2026, 3, 2)),
        ];
        let stats = aggregate_stats(&customers, now);
        let labels: Vec<&str> = stats
            .monthly_growth
            .iter()
            .map(|month| month.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["2025-10", "2025-11", "2025-12", "2026-01", "2026-02", "2026-03"]
        );
        assert_eq!(stats.monthly_growth[0].count, 1);
        assert_eq!(stats.monthly_growth[5].count, 2);
    }
}
