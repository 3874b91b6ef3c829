//! Dashboard card deck: one live card over store data, the rest static
//! placeholders for source systems outside this console's scope.

use crate::cache::{CacheControl, Cached};
use crate::stats::{DashboardStats, aggregate_stats};
use chrono::Utc;
use jia_client::{CustomerStore, StoreError};
use log::debug;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Static placeholder cards for the other source systems.
const STATIC_CARDS: &[(&str, &str, &str, &str, &str)] = &[
    ("Vendor Master", "SAP", "1,253", "+3%", "42"),
    ("Material/Item Master", "SAP", "12,489", "+3%", "320"),
    ("Equipment Master", "SAP", "854", "+2%", "26"),
    ("Tax Code Master", "SAP", "124", "+5%", "6"),
    ("Employee Master", "DarwinBox", "2,879", "+5%", "135"),
    ("Role/Designation Master", "DarwinBox", "168", "+8%", "12"),
    ("Planning Manager", "TOS", "47", "+12%", "5"),
    ("Cargo Master", "TOS", "1,495", "+4%", "63"),
];

/// One dashboard card.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatCard {
    /// Card title, e.g. `Customer Master`.
    pub title: String,
    /// Source system the data comes from.
    pub source: String,
    /// Headline record count, formatted for display.
    pub count: String,
    /// Growth indicator, e.g. `+3%`.
    pub trend: String,
    /// New records last month, formatted for display.
    pub new_count: String,
}

/// Dashboard view over the customer store.
pub struct Dashboard {
    store: Arc<dyn CustomerStore>,
    caches: Arc<CacheControl>,
    stats: Mutex<Cached<DashboardStats>>,
}

impl Dashboard {
    /// Build a dashboard bound to the shared cache handle.
    pub fn new(store: Arc<dyn CustomerStore>, caches: Arc<CacheControl>) -> Self {
        Self {
            store,
            caches,
            stats: Mutex::new(Cached::new()),
        }
    }

    /// Aggregate statistics for the customer collection, cached per
    /// generation.
    pub async fn stats(&self) -> Result<DashboardStats, StoreError> {
        let generation = self.caches.generation();
        if let Some(stats) = self.stats.lock().get(generation) {
            return Ok(stats.clone());
        }
        debug!("recomputing dashboard stats (generation={generation})");
        let customers = self.store.list_customers().await?;
        let stats = aggregate_stats(&customers, Utc::now());
        self.stats.lock().put(generation, stats.clone());
        Ok(stats)
    }

    /// Full card deck: the live Customer Master card first, then the
    /// static source-system placeholders.
    pub async fn cards(&self) -> Result<Vec<StatCard>, StoreError> {
        let stats = self.stats().await?;
        let mut cards = vec![StatCard {
            title: "Customer Master".to_string(),
            source: "SAP".to_string(),
            count: format_count(stats.total),
            trend: format!("+{:.0}%", stats.growth_rate_percent),
            new_count: stats.new_last_month.to_string(),
        }];
        cards.extend(
            STATIC_CARDS
                .iter()
                .map(|(title, source, count, trend, new_count)| StatCard {
                    title: (*title).to_string(),
                    source: (*source).to_string(),
                    count: (*count).to_string(),
                    trend: (*trend).to_string(),
                    new_count: (*new_count).to_string(),
                }),
        );
        Ok(cards)
    }
}

/// Render a count with thousands separators, e.g. `5,842`.
fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::format_count;
    use pretty_assertions::assert_eq;

    #[test]
    fn count_formatting_inserts_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(842), "842");
        assert_eq!(format_count(5842), "5,842");
        assert_eq!(format_count(1248933), "1,248,933");
    }
}
