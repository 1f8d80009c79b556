//! The analytics engine: turns the raw transaction ledger into financial
//! summaries, category breakdowns, monthly trends, anomaly flags, and
//! insights.
//!
//! Every operation is a pure filter -> group -> reduce -> format pipeline
//! over the [`Ledger`] collaborator. Nothing is cached; operations that
//! depend on "now" take `today` explicitly so the windows are
//! deterministic under test.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TallyError};
use crate::fmt::{self, Percentage};
use crate::models::{Period, TxKind};
use crate::store::{Ledger, TxFilter};

/// A category's current month is anomalous when it exceeds this multiple
/// of its trailing average.
const ANOMALY_THRESHOLD: f64 = 1.5;

/// How far back anomaly detection looks, in calendar months.
const ANOMALY_WINDOW_MONTHS: u32 = 3;

/// Months of trend history folded into the insights bundle.
const INSIGHT_TREND_MONTHS: u32 = 3;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Display echo of the requested period. Open bounds are reported with the
/// "all-time"/"present" sentinels, never as null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEcho {
    pub start_date: String,
    pub end_date: String,
}

impl PeriodEcho {
    fn from_period(period: &Period) -> Self {
        PeriodEcho {
            start_date: period
                .start
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "all-time".to_string()),
            end_date: period
                .end
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "present".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub period: PeriodEcho,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category_id: i64,
    pub category_name: String,
    pub amount: f64,
    pub count: u64,
    pub percentage: Percentage,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub total: f64,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub category: String,
    pub current_spending: f64,
    pub average_spending: f64,
    pub percentage_increase: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightMessage {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSpending {
    pub category: String,
    pub amount: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalySummary {
    pub count: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub summary: InsightMessage,
    pub top_spending: TopSpending,
    pub trend: InsightMessage,
    pub anomalies: AnomalySummary,
}

// ---------------------------------------------------------------------------
// Financial summary
// ---------------------------------------------------------------------------

/// Total income, total expenses and their difference for the user's
/// transactions within `period`.
pub fn financial_summary(
    ledger: &dyn Ledger,
    user_id: i64,
    period: &Period,
) -> Result<FinancialSummary> {
    debug!(user_id, "computing financial summary");
    let txs = ledger.query_transactions(user_id, &TxFilter::for_period(*period))?;

    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    for tx in &txs {
        match tx.kind {
            TxKind::Income => total_income += tx.amount,
            TxKind::Expense => total_expenses += tx.amount,
        }
    }

    Ok(FinancialSummary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        period: PeriodEcho::from_period(period),
    })
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

/// Per-category totals and each category's share of the grand total for
/// one transaction kind.
///
/// Groups whose category can no longer be resolved are dropped, and the
/// grand total is computed after the drop, so the remaining shares still
/// sum to 100.
pub fn category_breakdown(
    ledger: &dyn Ledger,
    user_id: i64,
    period: &Period,
    kind: TxKind,
) -> Result<CategoryBreakdown> {
    debug!(user_id, kind = kind.as_str(), "computing category breakdown");
    let filter = TxFilter::for_period(*period).kind(kind);
    let txs = ledger.query_transactions(user_id, &filter)?;

    let mut groups: BTreeMap<i64, (f64, u64)> = BTreeMap::new();
    for tx in &txs {
        let entry = groups.entry(tx.category_id).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let mut resolved: Vec<(i64, String, f64, u64)> = Vec::new();
    for (category_id, (amount, count)) in groups {
        match ledger.resolve_category_name(category_id)? {
            Some(name) => resolved.push((category_id, name, amount, count)),
            None => debug!(category_id, "dropping group with unresolvable category"),
        }
    }

    let total: f64 = resolved.iter().map(|(_, _, amount, _)| amount).sum();
    // Stable sort: amount-equal groups keep their category-id order.
    resolved.sort_by(|a, b| b.2.total_cmp(&a.2));

    let categories = resolved
        .into_iter()
        .map(|(category_id, category_name, amount, count)| CategoryShare {
            category_id,
            category_name,
            amount,
            count,
            percentage: Percentage::of(amount, total),
        })
        .collect();

    Ok(CategoryBreakdown { total, categories })
}

// ---------------------------------------------------------------------------
// Monthly trends
// ---------------------------------------------------------------------------

/// One entry per calendar month with at least one transaction in the
/// trailing `months`-month window ending at `today`, chronologically
/// ascending. A month with only one kind of activity still appears, the
/// missing kind as 0.
pub fn monthly_trends(
    ledger: &dyn Ledger,
    user_id: i64,
    months: u32,
    today: NaiveDate,
) -> Result<Vec<MonthlyTrend>> {
    if months < 1 {
        return Err(TallyError::BadRequest(format!(
            "months must be at least 1, got {months}"
        )));
    }
    debug!(user_id, months, "computing monthly trends");

    let period = Period::trailing_months(today, months);
    let txs = ledger.query_transactions(user_id, &TxFilter::for_period(period))?;

    // (year, month) -> (income, expense); BTreeMap keeps the keys in
    // chronological order.
    let mut buckets: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for tx in &txs {
        let entry = buckets
            .entry((tx.date.year(), tx.date.month()))
            .or_insert((0.0, 0.0));
        match tx.kind {
            TxKind::Income => entry.0 += tx.amount,
            TxKind::Expense => entry.1 += tx.amount,
        }
    }

    Ok(buckets
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyTrend {
            month,
            year,
            month_name: fmt::month_name(month).to_string(),
            income,
            expense,
            balance: income - expense,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Anomaly detection
// ---------------------------------------------------------------------------

/// Flags categories whose current-month expense total exceeds 150% of
/// their average monthly spend over the prior active months in the
/// trailing window.
///
/// Only months with activity feed the average, and the current month is
/// not part of its own baseline; a category with no prior activity (or no
/// current-month activity) is never flagged. Output is ordered by
/// ascending category id.
pub fn detect_anomalies(ledger: &dyn Ledger, user_id: i64, today: NaiveDate) -> Result<Vec<Anomaly>> {
    debug!(user_id, "detecting spending anomalies");

    let period = Period::trailing_months(today, ANOMALY_WINDOW_MONTHS);
    let filter = TxFilter::for_period(period).kind(TxKind::Expense);
    let txs = ledger.query_transactions(user_id, &filter)?;

    // Monthly expense totals per category.
    let mut monthly: BTreeMap<(i64, i32, u32), f64> = BTreeMap::new();
    for tx in &txs {
        *monthly
            .entry((tx.category_id, tx.date.year(), tx.date.month()))
            .or_insert(0.0) += tx.amount;
    }

    // Fold the monthly totals by category.
    let mut per_category: BTreeMap<i64, Vec<((i32, u32), f64)>> = BTreeMap::new();
    for ((category_id, year, month), total) in monthly {
        per_category
            .entry(category_id)
            .or_default()
            .push(((year, month), total));
    }

    let current = (today.year(), today.month());
    let mut anomalies = Vec::new();
    for (category_id, month_totals) in per_category {
        let Some(&(_, current_total)) = month_totals.iter().find(|(ym, _)| *ym == current) else {
            continue;
        };
        let prior: Vec<f64> = month_totals
            .iter()
            .filter(|(ym, _)| *ym != current)
            .map(|(_, total)| *total)
            .collect();
        if prior.is_empty() {
            continue;
        }
        let avg = prior.iter().sum::<f64>() / prior.len() as f64;
        // Guard: a zero average would make the ratio undefined.
        if avg <= 0.0 || current_total <= avg * ANOMALY_THRESHOLD {
            continue;
        }
        let Some(category) = ledger.resolve_category_name(category_id)? else {
            continue;
        };
        anomalies.push(Anomaly {
            category,
            current_spending: current_total,
            average_spending: avg,
            percentage_increase: fmt::fixed2((current_total / avg - 1.0) * 100.0),
        });
    }

    Ok(anomalies)
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// Composes the other four views into a short narrative bundle for the
/// current calendar month.
pub fn generate_insights(ledger: &dyn Ledger, user_id: i64, today: NaiveDate) -> Result<Insights> {
    debug!(user_id, "generating insights");

    let this_month = Period::month_to_date(today);
    let summary = financial_summary(ledger, user_id, &this_month)?;
    let breakdown = category_breakdown(ledger, user_id, &this_month, TxKind::Expense)?;
    let trends = monthly_trends(ledger, user_id, INSIGHT_TREND_MONTHS, today)?;
    let anomalies = detect_anomalies(ledger, user_id, today)?;

    let summary_message = if summary.balance >= 0.0 {
        format!(
            "You're in the positive this month by {}",
            fmt::money(summary.balance)
        )
    } else {
        format!(
            "You're in the negative this month by {}",
            fmt::money(summary.balance.abs())
        )
    };

    let top = breakdown.categories.first();
    let top_spending = TopSpending {
        category: top
            .map(|c| c.category_name.clone())
            .unwrap_or_else(|| "No data".to_string()),
        amount: top.map(|c| c.amount).unwrap_or(0.0),
        message: format!(
            "Your highest spending category is {}",
            top.map(|c| c.category_name.as_str()).unwrap_or("None")
        ),
    };

    let trend_message = if trends.len() >= 2 {
        let last = &trends[trends.len() - 1];
        let previous = &trends[trends.len() - 2];
        if last.balance > previous.balance {
            "Your savings are improving compared to last month"
        } else {
            "Your savings have decreased compared to last month"
        }
    } else {
        "Not enough data to compare with last month"
    }
    .to_string();

    let anomaly_summary = AnomalySummary {
        count: anomalies.len(),
        message: if anomalies.is_empty() {
            "No unusual spending detected this month".to_string()
        } else {
            format!(
                "We detected {} unusual spending patterns this month",
                anomalies.len()
            )
        },
    };

    Ok(Insights {
        summary: InsightMessage { message: summary_message },
        top_spending,
        trend: InsightMessage { message: trend_message },
        anomalies: anomaly_summary,
    })
}
