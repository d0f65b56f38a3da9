//! Platform statistics and the donor leaderboard, computed as pure folds over
//! the donation set. Amounts are accumulated with `rust_decimal` so that
//! "0.1" + "0.2" is exactly "0.3"; nothing here touches binary floating point
//! or caches results between calls.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::schema::Donation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatistics {
    pub total_donations: u64,
    #[serde(rename = "totalDonationsETH")]
    pub total_donations_eth: String,
    pub total_donors: u64,
    pub average_donation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub donor_address: String,
    pub total_amount: String,
    pub donation_count: u64,
}

/// Stored amounts are validated on insert; a row that fails to parse is
/// counted as zero rather than failing the whole aggregate.
fn amount_or_zero(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or_else(|_| {
        log::warn!("Skipping malformed stored amount {raw:?}");
        Decimal::ZERO
    })
}

fn amount_of(donation: &Donation) -> Decimal {
    amount_or_zero(&donation.amount)
}

/// Totals saturate at `Decimal::MAX` instead of overflowing, so a read-only
/// aggregate can never fault on amounts the ledger accepted.
pub fn sum_amounts<'a>(amounts: impl Iterator<Item = &'a str>) -> Decimal {
    amounts
        .map(amount_or_zero)
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

pub fn platform_statistics(donations: &[Donation]) -> PlatformStatistics {
    let count = donations.len() as u64;
    let sum = donations
        .iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(amount_of(d)));
    let donors: BTreeSet<&str> = donations.iter().map(|d| d.donor_address.as_str()).collect();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    };
    PlatformStatistics {
        total_donations: count,
        total_donations_eth: sum.normalize().to_string(),
        total_donors: donors.len() as u64,
        average_donation: average.normalize().to_string(),
    }
}

/// Top `limit` non-anonymous donors by total donated amount. Ordering is
/// deterministic: descending total, then donor address ascending.
pub fn donor_leaderboard(donations: &[Donation], limit: usize) -> Vec<LeaderboardEntry> {
    let mut per_donor: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for donation in donations {
        if donation.is_anonymous {
            continue;
        }
        let entry = per_donor
            .entry(donation.donor_address.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(amount_of(donation));
        entry.1 += 1;
    }

    let mut ranked: Vec<(&str, Decimal, u64)> = per_donor
        .into_iter()
        .map(|(donor, (total, count))| (donor, total, count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(donor, total, count)| LeaderboardEntry {
            donor_address: donor.to_owned(),
            total_amount: total.normalize().to_string(),
            donation_count: count,
        })
        .collect()
}
