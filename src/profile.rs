//! The single local patient profile.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::db::{format_timestamp, parse_date, parse_timestamp, DatabaseError, StoreError};
use crate::models::{ProfileUpdate, UserProfile};
use crate::validation::{check_email, check_length, parse_iso_date, ValidationError};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 30;

/// Surgery dates older than this are most likely typos.
pub const SURGERY_DATE_MAX_AGE_MONTHS: u32 = 24;

pub fn validate_profile(update: &ProfileUpdate) -> Result<(), ValidationError> {
    check_length("First name", &update.first_name, NAME_MIN_LEN, NAME_MAX_LEN)?;
    check_length("Last name", &update.last_name, NAME_MIN_LEN, NAME_MAX_LEN)?;
    check_email(&update.email)
}

/// Parses and range-checks a surgery date against `today`.
pub fn validate_surgery_date(value: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let date = parse_iso_date("Surgery date", value)?;
    if date > today {
        return Err(ValidationError::SurgeryDateInFuture);
    }
    let earliest = today
        .checked_sub_months(Months::new(SURGERY_DATE_MAX_AGE_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    if date < earliest {
        return Err(ValidationError::SurgeryDateTooOld);
    }
    Ok(date)
}

/// `None` until the patient has saved a profile.
pub fn get_profile(conn: &Connection) -> Result<Option<UserProfile>, DatabaseError> {
    let row = conn.query_row(
        "SELECT first_name, last_name, email, surgery_date, updated_at
         FROM profile WHERE id = 1",
        [],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        },
    );
    let (first_name, last_name, email, surgery_date, updated_at) = match row {
        Ok(r) => r,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(UserProfile {
        first_name,
        last_name,
        email,
        surgery_date: surgery_date.as_deref().map(parse_date).transpose()?,
        updated_at: parse_timestamp(&updated_at)?,
    }))
}

/// Creates or replaces the name and email. A stored surgery date is kept.
pub fn save_profile(
    conn: &Connection,
    update: &ProfileUpdate,
    now: DateTime<Utc>,
) -> Result<UserProfile, StoreError> {
    validate_profile(update)?;
    conn.execute(
        "INSERT INTO profile (id, first_name, last_name, email, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             first_name = excluded.first_name,
             last_name = excluded.last_name,
             email = excluded.email,
             updated_at = excluded.updated_at",
        params![
            update.first_name.trim(),
            update.last_name.trim(),
            update.email.trim(),
            format_timestamp(&now),
        ],
    )
    .map_err(DatabaseError::from)?;
    tracing::debug!("Profile saved");

    Ok(get_profile(conn)?.ok_or_else(|| DatabaseError::not_found("Profile", "1"))?)
}

/// Sets the surgery date after checking it is neither in the future nor
/// more than two years before the UTC date of `now`.
pub fn update_surgery_date(
    conn: &Connection,
    value: &str,
    now: DateTime<Utc>,
) -> Result<UserProfile, StoreError> {
    let date = validate_surgery_date(value, now.date_naive())?;
    let updated = conn
        .execute(
            "UPDATE profile SET surgery_date = ?1, updated_at = ?2 WHERE id = 1",
            params![date.to_string(), format_timestamp(&now)],
        )
        .map_err(DatabaseError::from)?;
    if updated == 0 {
        return Err(DatabaseError::not_found("Profile", "1").into());
    }
    tracing::debug!(surgery_date = %date, "Surgery date updated");

    Ok(get_profile(conn)?.ok_or_else(|| DatabaseError::not_found("Profile", "1"))?)
}
