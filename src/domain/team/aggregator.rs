//! Roster-wide totals, rankings and shares.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Amount, Percentage};

use super::TeamMemberMetric;

/// Numeric field a roster can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    TotalPatients,
    #[serde(rename = "income_this_period")]
    Income,
    #[serde(rename = "expenses_this_period")]
    Expenses,
    #[serde(rename = "balance_this_period")]
    Balance,
    #[serde(rename = "appointments_this_period")]
    Appointments,
    #[serde(rename = "procedures_this_period")]
    Procedures,
}

impl MetricField {
    pub fn name(&self) -> &'static str {
        match self {
            MetricField::TotalPatients => "total_patients",
            MetricField::Income => "income_this_period",
            MetricField::Expenses => "expenses_this_period",
            MetricField::Balance => "balance_this_period",
            MetricField::Appointments => "appointments_this_period",
            MetricField::Procedures => "procedures_this_period",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            MetricField::TotalPatients,
            MetricField::Income,
            MetricField::Expenses,
            MetricField::Balance,
            MetricField::Appointments,
            MetricField::Procedures,
        ]
        .into_iter()
        .find(|field| field.name() == name.trim())
    }

    /// Value of this field for one member.
    pub fn value_of(&self, metric: &TeamMemberMetric) -> Decimal {
        match self {
            MetricField::TotalPatients => Decimal::from(metric.total_patients),
            MetricField::Income => metric.income_this_period.value(),
            MetricField::Expenses => metric.expenses_this_period.value(),
            MetricField::Balance => metric.balance_this_period(),
            MetricField::Appointments => Decimal::from(metric.appointments_this_period),
            MetricField::Procedures => Decimal::from(metric.procedures_this_period),
        }
    }
}

/// Sums across the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTotals {
    pub members: usize,
    pub total_patients: u64,
    pub income_this_period: Amount,
    pub expenses_this_period: Amount,
    pub balance_this_period: Decimal,
    pub appointments_this_period: u64,
    pub procedures_this_period: u64,
}

pub struct TeamMetricsAggregator;

impl TeamMetricsAggregator {
    pub fn totals(members: &[TeamMemberMetric]) -> TeamTotals {
        let mut totals = TeamTotals {
            members: members.len(),
            ..TeamTotals::default()
        };
        for member in members {
            totals.total_patients += u64::from(member.total_patients);
            totals.income_this_period = totals.income_this_period + member.income_this_period;
            totals.expenses_this_period = totals.expenses_this_period + member.expenses_this_period;
            totals.appointments_this_period += u64::from(member.appointments_this_period);
            totals.procedures_this_period += u64::from(member.procedures_this_period);
        }
        totals.balance_this_period =
            totals.income_this_period.value() - totals.expenses_this_period.value();
        totals
    }

    /// Members sorted by `field` descending, equal values in input order,
    /// truncated to `top_n`. Never padded.
    pub fn rank(members: &[TeamMemberMetric], field: MetricField, top_n: usize) -> Vec<TeamMemberMetric> {
        let mut ranked = members.to_vec();
        ranked.sort_by(|a, b| field.value_of(b).cmp(&field.value_of(a)));
        ranked.truncate(top_n);
        ranked
    }

    /// The member's share of `total_income`; zero when the total is zero.
    pub fn contribution_share(member: &TeamMemberMetric, total_income: Decimal) -> Percentage {
        Percentage::of(member.income_this_period.value(), total_income)
    }
}
