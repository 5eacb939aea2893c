//! Equipment data model
//!
//! One `EquipmentRecord` per piece of golf equipment or accessory. Which
//! optional fields are meaningful depends on `Category`; the suppression
//! rules live in [`crate::normalize`], never at call sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Equipment category
///
/// Serialized values match the display strings the app has always used,
/// so exported data stays readable as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Driver,
    #[serde(rename = "Fairway Wood")]
    FairwayWood,
    Hybrid,
    Iron,
    Wedge,
    Putter,
    Accessory,
    Other,
}

impl Category {
    /// Display string (also the serialized form)
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Driver => "Driver",
            Category::FairwayWood => "Fairway Wood",
            Category::Hybrid => "Hybrid",
            Category::Iron => "Iron",
            Category::Wedge => "Wedge",
            Category::Putter => "Putter",
            Category::Accessory => "Accessory",
            Category::Other => "Other",
        }
    }

    /// Parse from the display string
    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "Driver" => Some(Category::Driver),
            "Fairway Wood" => Some(Category::FairwayWood),
            "Hybrid" => Some(Category::Hybrid),
            "Iron" => Some(Category::Iron),
            "Wedge" => Some(Category::Wedge),
            "Putter" => Some(Category::Putter),
            "Accessory" => Some(Category::Accessory),
            "Other" => Some(Category::Other),
            _ => None,
        }
    }

    /// All categories in form-display order
    pub fn all() -> &'static [Category] {
        &[
            Category::Driver,
            Category::FairwayWood,
            Category::Hybrid,
            Category::Iron,
            Category::Wedge,
            Category::Putter,
            Category::Accessory,
            Category::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which bucket a record currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "In Bag")]
    Bag,
    #[serde(rename = "Locker Room")]
    Locker,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Bag => "In Bag",
            Location::Locker => "Locker Room",
        }
    }

    pub fn parse(s: &str) -> Option<Location> {
        match s {
            "In Bag" => Some(Location::Bag),
            "Locker Room" => Some(Location::Locker),
            _ => None,
        }
    }

    /// The other bucket
    pub fn toggled(&self) -> Location {
        match self {
            Location::Bag => Location::Locker,
            Location::Locker => Location::Bag,
        }
    }
}

/// Launch monitor measurement bundle; every field independently optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchData {
    /// Carry distance in yards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carry_distance: Option<f64>,
    /// Total distance in yards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    /// Ball speed in mph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_speed: Option<f64>,
    /// Club head speed in mph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smash_factor: Option<f64>,
    /// Spin rate in rpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin_rate: Option<f64>,
    /// Launch angle in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LaunchData {
    /// True when no measurement has been recorded
    pub fn is_empty(&self) -> bool {
        self.carry_distance.is_none()
            && self.total_distance.is_none()
            && self.ball_speed.is_none()
            && self.club_speed.is_none()
            && self.smash_factor.is_none()
            && self.spin_rate.is_none()
            && self.launch_angle.is_none()
            && self.notes.is_none()
    }
}

/// One piece of golf equipment or an accessory
///
/// Invariants (maintained by [`crate::normalize::normalize_for_save`]):
/// - `set_composition`, when present, is non-empty, deduplicated and in
///   canonical club-position order
/// - `loft` is absent for accessories and for multi-piece iron sets
/// - shaft fields are absent for accessories
/// - optional strings are never stored as empty strings
/// - the trade-in triple is set together or not at all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub category: Category,
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_composition: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaft_make_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaft_stiffness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_data: Option<LaunchData>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "status")]
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_in_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_in_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade_in_check: Option<DateTime<Utc>>,
}

/// Best-effort partial record returned by the AI extraction service
///
/// Structurally mirrors the editable fields of a record but is never
/// persisted directly; it only pre-populates the form, and whatever the
/// user submits goes through the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSuggestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_composition: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaft_make_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaft_stiffness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
}

/// Validated trade-in valuation pair (advisory only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeInEstimate {
    pub low: f64,
    pub high: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_to_display_strings() {
        let json = serde_json::to_string(&Category::FairwayWood).unwrap();
        assert_eq!(json, "\"Fairway Wood\"");
        let back: Category = serde_json::from_str("\"Fairway Wood\"").unwrap();
        assert_eq!(back, Category::FairwayWood);
    }

    #[test]
    fn category_parse_round_trips_all_variants() {
        for cat in Category::all() {
            assert_eq!(Category::parse(cat.as_str()), Some(*cat));
        }
        assert_eq!(Category::parse("Mallet"), None);
    }

    #[test]
    fn location_toggle_flips_both_ways() {
        assert_eq!(Location::Bag.toggled(), Location::Locker);
        assert_eq!(Location::Locker.toggled(), Location::Bag);
        assert_eq!(Location::parse("In Bag"), Some(Location::Bag));
        assert_eq!(Location::parse("Locker Room"), Some(Location::Locker));
    }

    #[test]
    fn launch_data_empty_detection() {
        assert!(LaunchData::default().is_empty());
        let data = LaunchData {
            carry_distance: Some(240.0),
            ..Default::default()
        };
        assert!(!data.is_empty());
    }

    #[test]
    fn record_json_uses_original_field_names() {
        let record = EquipmentRecord {
            id: Uuid::nil(),
            category: Category::Driver,
            brand: "TaylorMade".to_string(),
            model: "M4".to_string(),
            loft: Some("10.5".to_string()),
            set_composition: None,
            shaft_make_model: None,
            shaft_stiffness: None,
            photo_url: None,
            receipt_url: None,
            purchase_date: None,
            price: Some(149.99),
            notes: None,
            launch_data: None,
            created_at: Utc::now(),
            location: Location::Bag,
            trade_in_low: None,
            trade_in_high: None,
            last_trade_in_check: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "Driver");
        assert_eq!(value["status"], "In Bag");
        assert_eq!(value["loft"], "10.5");
        // absent optionals are omitted entirely, never null
        assert!(value.get("setComposition").is_none());
    }
}
