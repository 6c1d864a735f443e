use validator::Validate;

use crate::error::{Error, Result};
use crate::utils::time;

pub fn validate<T: Validate>(val: &T) -> Result<()> {
    val.validate().map_err(Error::from)
}

pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn require_date(field: &str, value: &str) -> Result<chrono::NaiveDate> {
    require_text(field, value)?;
    time::parse_date(value)
        .ok_or_else(|| Error::Validation(format!("{} is not a valid date: {}", field, value)))
}
