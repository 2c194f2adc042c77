//! Count metrics and chart specs, derived fresh from the fetched rows on
//! every overview render. Everything in here is a total function: empty
//! lists, missing columns and junk cells degrade to empty output, never to
//! an error.

use super::models::{Payment, Property};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub property_count: usize,
    pub active_count: usize,
    pub paid_count: usize,
    pub outstanding_count: usize,
}

impl MetricsSnapshot {
    pub fn compute(properties: &[Property], payments: &[Payment]) -> Self {
        let paid_count = payments.iter().filter(|p| p.is_paid()).count();
        Self {
            property_count: properties.len(),
            active_count: properties.iter().filter(|p| p.is_active()).count(),
            paid_count,
            // paid_count <= len() by construction, so this cannot underflow
            outstanding_count: payments.len() - paid_count,
        }
    }
}

/// Pie of properties per status string, in first-seen order.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSpec {
    pub title: String,
    pub slices: Vec<(String, usize)>,
}

pub fn pie_spec(properties: &[Property]) -> Option<PieSpec> {
    if properties.is_empty() {
        return None;
    }
    let mut slices: Vec<(String, usize)> = Vec::new();
    for property in properties {
        match slices.iter_mut().find(|(status, _)| *status == property.status) {
            Some((_, count)) => *count += 1,
            None => slices.push((property.status.clone(), 1)),
        }
    }
    Some(PieSpec {
        title: "Property statuses".to_string(),
        slices,
    })
}

/// One bar per payment that carries a numeric amount, colored by status.
#[derive(Clone, Debug, PartialEq)]
pub struct BarSpec {
    pub title: String,
    pub bars: Vec<Bar>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub date: String,
    pub amount: f64,
    pub status: String,
}

/// `None` when there are no payments or none of them have a usable amount
/// (which is also what a missing Amount column looks like).
pub fn bar_spec(payments: &[Payment]) -> Option<BarSpec> {
    let bars: Vec<Bar> = payments
        .iter()
        .filter_map(|payment| {
            payment.amount.map(|amount| Bar {
                date: payment.date.clone(),
                amount,
                status: payment.status.clone(),
            })
        })
        .collect();
    if bars.is_empty() {
        return None;
    }
    Some(BarSpec {
        title: "Payments".to_string(),
        bars,
    })
}
