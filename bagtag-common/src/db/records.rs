//! Equipment record database operations
//!
//! All operations are scoped by `user_id`; a record is only ever visible
//! to (and mutable by) the account that created it. Listing returns
//! newest-first by `created_at`. Optional fields round-trip as NULL and
//! come back as absent, never as empty strings.

use crate::model::{Category, EquipmentRecord, LaunchData, Location};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Corrupt {} timestamp: {}", column, e)))
}

/// Map one clubs row to a record
fn record_from_row(row: &SqliteRow) -> Result<EquipmentRecord> {
    let id: String = row.try_get("club_id")?;
    let id = id
        .parse::<Uuid>()
        .map_err(|e| Error::Internal(format!("Corrupt club_id: {}", e)))?;

    let category: String = row.try_get("category")?;
    let category = Category::parse(&category)
        .ok_or_else(|| Error::Internal(format!("Unknown category: {}", category)))?;

    let location: String = row.try_get("location")?;
    let location = Location::parse(&location)
        .ok_or_else(|| Error::Internal(format!("Unknown location: {}", location)))?;

    let set_composition: Option<String> = row.try_get("set_composition")?;
    let set_composition = set_composition
        .map(|json| serde_json::from_str::<Vec<String>>(&json))
        .transpose()
        .map_err(|e| Error::Internal(format!("Corrupt set_composition: {}", e)))?;

    let launch_data: Option<String> = row.try_get("launch_data")?;
    let launch_data = launch_data
        .map(|json| serde_json::from_str::<LaunchData>(&json))
        .transpose()
        .map_err(|e| Error::Internal(format!("Corrupt launch_data: {}", e)))?;

    let created_at: String = row.try_get("created_at")?;
    let last_trade_in_check: Option<String> = row.try_get("last_trade_in_check")?;

    Ok(EquipmentRecord {
        id,
        category,
        brand: row.try_get("brand")?,
        model: row.try_get("model")?,
        loft: row.try_get("loft")?,
        set_composition,
        shaft_make_model: row.try_get("shaft_make_model")?,
        shaft_stiffness: row.try_get("shaft_stiffness")?,
        photo_url: row.try_get("photo_url")?,
        receipt_url: row.try_get("receipt_url")?,
        purchase_date: row.try_get("purchase_date")?,
        price: row.try_get("price")?,
        notes: row.try_get("notes")?,
        launch_data,
        created_at: parse_timestamp(&created_at, "created_at")?,
        location,
        trade_in_low: row.try_get("trade_in_low")?,
        trade_in_high: row.try_get("trade_in_high")?,
        last_trade_in_check: last_trade_in_check
            .map(|s| parse_timestamp(&s, "last_trade_in_check"))
            .transpose()?,
    })
}

fn composition_json(record: &EquipmentRecord) -> Result<Option<String>> {
    record
        .set_composition
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to encode set_composition: {}", e)))
}

fn launch_data_json(record: &EquipmentRecord) -> Result<Option<String>> {
    record
        .launch_data
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to encode launch_data: {}", e)))
}

/// List all records for a user, newest first
pub async fn list_for_user(db: &SqlitePool, user_id: Uuid) -> Result<Vec<EquipmentRecord>> {
    let rows = sqlx::query(
        "SELECT * FROM clubs WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id.to_string())
    .fetch_all(db)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// Fetch one record by id, scoped to its owner
pub async fn get_for_user(
    db: &SqlitePool,
    user_id: Uuid,
    club_id: Uuid,
) -> Result<EquipmentRecord> {
    let row = sqlx::query("SELECT * FROM clubs WHERE club_id = ? AND user_id = ?")
        .bind(club_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(db)
        .await?;

    match row {
        Some(row) => record_from_row(&row),
        None => Err(Error::NotFound(format!("No such club: {}", club_id))),
    }
}

/// Insert a freshly normalized record
pub async fn insert(db: &SqlitePool, user_id: Uuid, record: &EquipmentRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO clubs (
            club_id, user_id, category, brand, model, loft, set_composition,
            shaft_make_model, shaft_stiffness, photo_url, receipt_url,
            purchase_date, price, notes, launch_data, location,
            trade_in_low, trade_in_high, last_trade_in_check, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(user_id.to_string())
    .bind(record.category.as_str())
    .bind(&record.brand)
    .bind(&record.model)
    .bind(&record.loft)
    .bind(composition_json(record)?)
    .bind(&record.shaft_make_model)
    .bind(&record.shaft_stiffness)
    .bind(&record.photo_url)
    .bind(&record.receipt_url)
    .bind(&record.purchase_date)
    .bind(record.price)
    .bind(&record.notes)
    .bind(launch_data_json(record)?)
    .bind(record.location.as_str())
    .bind(record.trade_in_low)
    .bind(record.trade_in_high)
    .bind(record.last_trade_in_check.map(|t| t.to_rfc3339()))
    .bind(record.created_at.to_rfc3339())
    .execute(db)
    .await?;

    Ok(())
}

/// Full-field update of the mutable fields (edit-submit path)
///
/// `created_at` is immutable and never touched here.
pub async fn update(db: &SqlitePool, user_id: Uuid, record: &EquipmentRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE clubs SET
            category = ?, brand = ?, model = ?, loft = ?, set_composition = ?,
            shaft_make_model = ?, shaft_stiffness = ?, photo_url = ?,
            receipt_url = ?, purchase_date = ?, price = ?, notes = ?,
            launch_data = ?, location = ?,
            trade_in_low = ?, trade_in_high = ?, last_trade_in_check = ?
        WHERE club_id = ? AND user_id = ?
        "#,
    )
    .bind(record.category.as_str())
    .bind(&record.brand)
    .bind(&record.model)
    .bind(&record.loft)
    .bind(composition_json(record)?)
    .bind(&record.shaft_make_model)
    .bind(&record.shaft_stiffness)
    .bind(&record.photo_url)
    .bind(&record.receipt_url)
    .bind(&record.purchase_date)
    .bind(record.price)
    .bind(&record.notes)
    .bind(launch_data_json(record)?)
    .bind(record.location.as_str())
    .bind(record.trade_in_low)
    .bind(record.trade_in_high)
    .bind(record.last_trade_in_check.map(|t| t.to_rfc3339()))
    .bind(record.id.to_string())
    .bind(user_id.to_string())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("No such club: {}", record.id)));
    }
    Ok(())
}

/// Delete a record
pub async fn delete(db: &SqlitePool, user_id: Uuid, club_id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM clubs WHERE club_id = ? AND user_id = ?")
        .bind(club_id.to_string())
        .bind(user_id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("No such club: {}", club_id)));
    }
    Ok(())
}

/// Single-field mutation: move a record to the other bucket
pub async fn set_location(
    db: &SqlitePool,
    user_id: Uuid,
    club_id: Uuid,
    location: Location,
) -> Result<()> {
    let result = sqlx::query("UPDATE clubs SET location = ? WHERE club_id = ? AND user_id = ?")
        .bind(location.as_str())
        .bind(club_id.to_string())
        .bind(user_id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("No such club: {}", club_id)));
    }
    Ok(())
}

/// Single-statement update of the trade-in triple
///
/// Low, high and the check timestamp always change together; a failed
/// valuation fetch never reaches this function, so the prior triple
/// stays intact on failure.
pub async fn set_trade_in(
    db: &SqlitePool,
    user_id: Uuid,
    club_id: Uuid,
    low: f64,
    high: f64,
    checked_at: DateTime<Utc>,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE clubs SET trade_in_low = ?, trade_in_high = ?, last_trade_in_check = ?
         WHERE club_id = ? AND user_id = ?",
    )
    .bind(low)
    .bind(high)
    .bind(checked_at.to_rfc3339())
    .bind(club_id.to_string())
    .bind(user_id.to_string())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("No such club: {}", club_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::normalize::{normalize_for_save, RecordForm};

    fn form(brand: &str, model: &str) -> RecordForm {
        RecordForm {
            category: Category::Driver,
            location: Location::Bag,
            brand: brand.to_string(),
            model: model.to_string(),
            loft: String::new(),
            is_set: false,
            set_composition: Vec::new(),
            shaft_make_model: String::new(),
            shaft_stiffness: String::new(),
            price: String::new(),
            purchase_date: String::new(),
            notes: String::new(),
            photo_url: String::new(),
            receipt_url: String::new(),
            launch_data: None,
        }
    }

    #[tokio::test]
    async fn insert_and_list_round_trip() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let mut f = form("Ping", "G400");
        f.category = Category::Iron;
        f.is_set = true;
        f.set_composition = vec!["PW".into(), "4".into(), "7".into()];
        f.price = "399".to_string();
        let record = normalize_for_save(&f, None).unwrap();
        insert(&pool, user_id, &record).await.unwrap();

        let listed = list_for_user(&pool, user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], record);
        assert_eq!(
            listed[0].set_composition,
            Some(vec!["4".to_string(), "7".to_string(), "PW".to_string()])
        );
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let mut older = normalize_for_save(&form("Ping", "Anser"), None).unwrap();
        older.created_at = Utc::now() - chrono::Duration::days(2);
        let newer = normalize_for_save(&form("Odyssey", "White Hot"), None).unwrap();

        insert(&pool, user_id, &older).await.unwrap();
        insert(&pool, user_id, &newer).await.unwrap();

        let listed = list_for_user(&pool, user_id).await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn records_are_scoped_per_user() {
        let pool = test_pool().await;
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let record = normalize_for_save(&form("Titleist", "TSR3"), None).unwrap();
        insert(&pool, owner, &record).await.unwrap();

        assert!(list_for_user(&pool, stranger).await.unwrap().is_empty());
        assert!(matches!(
            get_for_user(&pool, stranger, record.id).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            delete(&pool, stranger, record.id).await,
            Err(Error::NotFound(_))
        ));
        // still there for the owner
        assert!(get_for_user(&pool, owner, record.id).await.is_ok());
    }

    #[tokio::test]
    async fn update_replaces_mutable_fields() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let record = normalize_for_save(&form("Cobra", "LTDx"), None).unwrap();
        insert(&pool, user_id, &record).await.unwrap();

        let mut f = form("Cobra", "Aerojet");
        f.loft = "9".to_string();
        f.notes = "new gamer".to_string();
        let updated = normalize_for_save(&f, Some(&record)).unwrap();
        update(&pool, user_id, &updated).await.unwrap();

        let fetched = get_for_user(&pool, user_id, record.id).await.unwrap();
        assert_eq!(fetched.model, "Aerojet");
        assert_eq!(fetched.loft, Some("9".to_string()));
        assert_eq!(fetched.created_at, record.created_at);
    }

    #[tokio::test]
    async fn location_toggle_persists() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let record = normalize_for_save(&form("Mizuno", "Pro 225"), None).unwrap();
        insert(&pool, user_id, &record).await.unwrap();

        set_location(&pool, user_id, record.id, record.location.toggled())
            .await
            .unwrap();

        let fetched = get_for_user(&pool, user_id, record.id).await.unwrap();
        assert_eq!(fetched.location, Location::Locker);
    }

    #[tokio::test]
    async fn trade_in_triple_set_together() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let record = normalize_for_save(&form("Callaway", "Epic"), None).unwrap();
        insert(&pool, user_id, &record).await.unwrap();
        assert_eq!(record.trade_in_low, None);

        let checked_at = Utc::now();
        set_trade_in(&pool, user_id, record.id, 120.0, 180.0, checked_at)
            .await
            .unwrap();

        let fetched = get_for_user(&pool, user_id, record.id).await.unwrap();
        assert_eq!(fetched.trade_in_low, Some(120.0));
        assert_eq!(fetched.trade_in_high, Some(180.0));
        assert!(fetched.last_trade_in_check.is_some());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let record = normalize_for_save(&form("Scotty Cameron", "Newport 2"), None).unwrap();
        insert(&pool, user_id, &record).await.unwrap();

        delete(&pool, user_id, record.id).await.unwrap();
        assert!(list_for_user(&pool, user_id).await.unwrap().is_empty());

        // deleting again reports not found
        assert!(matches!(
            delete(&pool, user_id, record.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn null_optionals_come_back_absent() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let record = normalize_for_save(&form("Wilson", "Staff"), None).unwrap();
        insert(&pool, user_id, &record).await.unwrap();

        let fetched = get_for_user(&pool, user_id, record.id).await.unwrap();
        assert_eq!(fetched.loft, None);
        assert_eq!(fetched.set_composition, None);
        assert_eq!(fetched.price, None);
        assert_eq!(fetched.launch_data, None);
        assert_eq!(fetched.last_trade_in_check, None);
    }
}
