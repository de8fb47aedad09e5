//! Range and shape checks shared by every coordinate constructor.
//!
//! Each function hands back the value it was given (or its parsed form) when the
//! value is acceptable, and a [`CodeGridError`] naming the violated bound otherwise.

use crate::coord::Hemisphere;
use crate::error::CodeGridError;
use crate::index::{DESIGNATOR_LENGTH, SUB_LEVEL_LENGTH, SubLevel};

/// Lower bound (inclusive) of a geodetic longitude in degrees
pub const MIN_LONGITUDE: f64 = -180.0;
/// Upper bound (exclusive) of a geodetic longitude in degrees
pub const MAX_LONGITUDE: f64 = 180.0;
/// Lower bound (inclusive) of a geodetic latitude in degrees
pub const MIN_LATITUDE: f64 = -90.0;
/// Upper bound (exclusive) of a geodetic latitude in degrees
pub const MAX_LATITUDE: f64 = 90.0;
/// Southern limit (inclusive) of the UTM projection band
pub const MIN_UTM_LATITUDE: f64 = -80.0;
/// Northern limit (inclusive) of the UTM projection band
pub const MAX_UTM_LATITUDE: f64 = 84.0;
/// First UTM zone number
pub const MIN_UTM_ZONE: u8 = 1;
/// Last UTM zone number
pub const MAX_UTM_ZONE: u8 = 60;

pub fn validate_longitude(longitude: f64) -> Result<f64, CodeGridError> {
    if (MIN_LONGITUDE..MAX_LONGITUDE).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(CodeGridError::validation(
            "longitude",
            format!("should be between [{MIN_LONGITUDE}, {MAX_LONGITUDE}), got {longitude}"),
        ))
    }
}

pub fn validate_latitude(latitude: f64) -> Result<f64, CodeGridError> {
    if (MIN_LATITUDE..MAX_LATITUDE).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(CodeGridError::validation(
            "latitude",
            format!("should be between [{MIN_LATITUDE}, {MAX_LATITUDE}), got {latitude}"),
        ))
    }
}

/// Validates a longitude/latitude pair, longitude first.
pub fn validate_geodetic(longitude: f64, latitude: f64) -> Result<(f64, f64), CodeGridError> {
    Ok((validate_longitude(longitude)?, validate_latitude(latitude)?))
}

/// Checks that a latitude lies in the band UTM is defined for.
///
/// A latitude can be a valid geodetic value and still fail here, so this reports
/// [`CodeGridError::Range`] rather than a validation error.
pub fn validate_utm_latitude(latitude: f64) -> Result<f64, CodeGridError> {
    if (MIN_UTM_LATITUDE..=MAX_UTM_LATITUDE).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(CodeGridError::range(
            "latitude",
            format!(
                "should be between [{MIN_UTM_LATITUDE}, {MAX_UTM_LATITUDE}], got {latitude}"
            ),
        ))
    }
}

pub fn validate_utm_zone(zone: u8) -> Result<u8, CodeGridError> {
    if (MIN_UTM_ZONE..=MAX_UTM_ZONE).contains(&zone) {
        Ok(zone)
    } else {
        Err(CodeGridError::validation(
            "zone",
            format!("should be between [{MIN_UTM_ZONE}, {MAX_UTM_ZONE}], got {zone}"),
        ))
    }
}

pub fn validate_hemisphere(hemisphere: &str) -> Result<Hemisphere, CodeGridError> {
    match hemisphere {
        "N" => Ok(Hemisphere::North),
        "S" => Ok(Hemisphere::South),
        other => Err(CodeGridError::validation(
            "hemisphere",
            format!("should be 'N' or 'S', got '{other}'"),
        )),
    }
}

/// Designators are exactly three characters; any script is allowed.
pub fn validate_designator(designator: &str) -> Result<&str, CodeGridError> {
    let length = designator.chars().count();
    if length == DESIGNATOR_LENGTH {
        Ok(designator)
    } else {
        Err(CodeGridError::validation(
            "designator",
            format!(
                "should be exactly {DESIGNATOR_LENGTH} characters, got '{designator}' ({length})"
            ),
        ))
    }
}

pub fn validate_sub_level(token: &str) -> Result<&str, CodeGridError> {
    let length = token.chars().count();
    if length == SUB_LEVEL_LENGTH {
        Ok(token)
    } else {
        Err(CodeGridError::validation(
            "sub level",
            format!("should be exactly {SUB_LEVEL_LENGTH} characters, got '{token}' ({length})"),
        ))
    }
}

/// Validates the token shape, then parses both characters as decimal digits
/// (easting digit first).
pub fn validate_sub_level_digits(token: &str) -> Result<SubLevel, CodeGridError> {
    validate_sub_level(token)?;

    let mut digits = token.chars().map(|c| c.to_digit(10));
    match (digits.next().flatten(), digits.next().flatten()) {
        (Some(easting), Some(northing)) => Ok(SubLevel::new(easting as u8, northing as u8)),
        _ => Err(CodeGridError::validation(
            "sub level",
            format!("should contain two decimal digits, got '{token}'"),
        )),
    }
}
