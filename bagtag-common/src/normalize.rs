//! Equipment record normalization and derived display values
//!
//! This module owns every category-conditional rule in one place: raw form
//! input goes through [`normalize_for_save`] before anything is persisted,
//! and read-time derivations (counts, totals, set labels, date formatting)
//! are computed freshly from the stored records on every call.
//!
//! All functions here are pure and synchronous.

use crate::model::{Category, EquipmentRecord, LaunchData, Location};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical club-position ordering for iron set compositions
///
/// Set compositions are always stored in this order, not insertion or
/// alphabetical order. Labels not in this list sort after all known
/// labels, keeping their relative order.
pub const CLUB_POSITIONS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "PW", "AW", "GW", "SW", "LW",
];

/// Rank of a label in the canonical ordering; unknown labels rank last
fn position_rank(label: &str) -> usize {
    CLUB_POSITIONS
        .iter()
        .position(|p| *p == label)
        .unwrap_or(CLUB_POSITIONS.len())
}

/// Clean and canonically sort a set-composition selection
///
/// Blank labels are dropped, duplicates collapse to their first
/// occurrence, and the result is stably sorted into canonical
/// club-position order.
pub fn sort_composition(labels: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for label in labels {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !cleaned.iter().any(|c| c == trimmed) {
            cleaned.push(trimmed.to_string());
        }
    }
    cleaned.sort_by_key(|label| position_rank(label));
    cleaned
}

/// Raw new/edit form input, all optional fields potentially empty strings
///
/// `price` stays a string here because that is what the form submits; it
/// is parsed (and validated) during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordForm {
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "status")]
    pub location: Location,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub loft: String,
    #[serde(default)]
    pub is_set: bool,
    #[serde(default)]
    pub set_composition: Vec<String>,
    #[serde(default)]
    pub shaft_make_model: String,
    #[serde(default)]
    pub shaft_stiffness: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub receipt_url: String,
    #[serde(default)]
    pub launch_data: Option<LaunchData>,
}

impl RecordForm {
    /// Rebuild form input from a stored record (edit prefill)
    pub fn from_record(record: &EquipmentRecord) -> Self {
        RecordForm {
            category: record.category,
            location: record.location,
            brand: record.brand.clone(),
            model: record.model.clone(),
            loft: record.loft.clone().unwrap_or_default(),
            is_set: record.set_composition.is_some(),
            set_composition: record.set_composition.clone().unwrap_or_default(),
            shaft_make_model: record.shaft_make_model.clone().unwrap_or_default(),
            shaft_stiffness: record.shaft_stiffness.clone().unwrap_or_default(),
            price: record.price.map(|p| p.to_string()).unwrap_or_default(),
            purchase_date: record.purchase_date.clone().unwrap_or_default(),
            notes: record.notes.clone().unwrap_or_default(),
            photo_url: record.photo_url.clone().unwrap_or_default(),
            receipt_url: record.receipt_url.clone().unwrap_or_default(),
            launch_data: record.launch_data.clone(),
        }
    }
}

/// Empty or whitespace-only input normalizes to absent, never to ""
fn opt_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse the raw price field; empty is absent, garbage and negatives are errors
fn parse_price(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| Error::InvalidInput(format!("Price is not a number: {:?}", trimmed)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput(format!(
            "Price must be a non-negative number, got {}",
            value
        )));
    }
    Ok(Some(value))
}

/// Transform raw form input into a canonical record ready for persistence
///
/// Rules applied, in one place:
/// - brand and model are required non-empty after trimming
/// - loft is suppressed for accessories and for iron sets with a non-empty
///   composition, regardless of input
/// - the set composition is retained only for iron sets, cleaned and
///   re-sorted into canonical club-position order
/// - shaft fields are suppressed for accessories
/// - every optional field normalizes empty-string input to absent
/// - `id` and `created_at` (and the trade-in triple, which only the refresh
///   path mutates) carry over unchanged from `existing` on update; a fresh
///   id and timestamp are assigned on create
///
/// Idempotent: feeding a normalized record back through (via
/// [`RecordForm::from_record`]) changes nothing.
pub fn normalize_for_save(
    form: &RecordForm,
    existing: Option<&EquipmentRecord>,
) -> Result<EquipmentRecord> {
    let brand = opt_string(&form.brand)
        .ok_or_else(|| Error::InvalidInput("Brand is required".to_string()))?;
    let model = opt_string(&form.model)
        .ok_or_else(|| Error::InvalidInput("Model is required".to_string()))?;

    let is_accessory = form.category == Category::Accessory;

    // Only an iron designated as a set with at least one surviving label
    // counts as a set; anything else stores no composition.
    let composition = if form.category == Category::Iron && form.is_set {
        let sorted = sort_composition(&form.set_composition);
        if sorted.is_empty() {
            None
        } else {
            Some(sorted)
        }
    } else {
        None
    };
    let is_iron_set = composition.is_some();

    let loft = if is_accessory || is_iron_set {
        None
    } else {
        opt_string(&form.loft)
    };

    let (shaft_make_model, shaft_stiffness) = if is_accessory {
        (None, None)
    } else {
        (
            opt_string(&form.shaft_make_model),
            opt_string(&form.shaft_stiffness),
        )
    };

    let launch_data = form
        .launch_data
        .clone()
        .filter(|data| !data.is_empty());

    let (id, created_at) = match existing {
        Some(record) => (record.id, record.created_at),
        None => (Uuid::new_v4(), chrono::Utc::now()),
    };

    Ok(EquipmentRecord {
        id,
        category: form.category,
        brand,
        model,
        loft,
        set_composition: composition,
        shaft_make_model,
        shaft_stiffness,
        photo_url: opt_string(&form.photo_url),
        receipt_url: opt_string(&form.receipt_url),
        purchase_date: opt_string(&form.purchase_date),
        price: parse_price(&form.price)?,
        notes: opt_string(&form.notes),
        launch_data,
        created_at,
        location: form.location,
        trade_in_low: existing.and_then(|r| r.trade_in_low),
        trade_in_high: existing.and_then(|r| r.trade_in_high),
        last_trade_in_check: existing.and_then(|r| r.last_trade_in_check),
    })
}

/// Derived counts and totals for one location bucket (or the whole collection)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedTotals {
    /// Club count, where a multi-piece set counts each piece
    pub item_count: usize,
    /// Sum of known prices; records without a price contribute 0
    pub total_value: f64,
}

/// Recompute counts and totals from the current record collection
///
/// A 7-piece iron set counts as 7 clubs, not 1 record. Always computed
/// freshly; with tens of records there is nothing worth caching.
pub fn compute_derived_totals(
    records: &[EquipmentRecord],
    location_filter: Option<Location>,
) -> DerivedTotals {
    let filtered = records
        .iter()
        .filter(|r| location_filter.map_or(true, |loc| r.location == loc));

    let mut item_count = 0;
    let mut total_value = 0.0;
    for record in filtered {
        item_count += record
            .set_composition
            .as_ref()
            .map_or(1, |c| c.len().max(1));
        total_value += record.price.unwrap_or(0.0);
    }

    DerivedTotals {
        item_count,
        total_value,
    }
}

/// Compact display label for a set composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetLabel {
    /// "4-PW" for runs of more than two clubs, "PW, SW" otherwise
    pub text: String,
    /// Number of clubs in the set
    pub count: usize,
}

/// Format a set composition for display
///
/// Compositions of more than two clubs compress to a `first-last` range of
/// the canonically sorted sequence; one or two clubs list them verbatim.
/// Empty or absent compositions produce no label.
pub fn format_set_label(composition: &[String]) -> Option<SetLabel> {
    if composition.is_empty() {
        return None;
    }
    let text = if composition.len() > 2 {
        format!(
            "{}-{}",
            composition[0],
            composition[composition.len() - 1]
        )
    } else {
        composition.join(", ")
    };
    Some(SetLabel {
        text,
        count: composition.len(),
    })
}

/// Format an optional purchase date for display
///
/// Absent dates render as an em-dash placeholder, parseable dates as
/// "Mon YYYY", and anything unparseable passes through verbatim. Never
/// fails.
pub fn format_display_date(date: Option<&str>) -> String {
    let raw = match date {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return "—".to_string(),
    };

    for pattern in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, pattern) {
            return parsed.format("%b %Y").to_string();
        }
    }
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%b %Y").to_string();
    }

    raw.to_string()
}

/// Format an optional price for display ("—" when absent)
pub fn format_display_price(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("${:.2}", value),
        None => "—".to_string(),
    }
}
