//! Input validation utilities
//!
//! Validators collect field-level problems into [`FieldErrors`] so a caller
//! sees every mistake in a request at once.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::{
    config::RADIUS_CEILING_METERS,
    models::{Coordinate, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page},
};

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulator for field errors
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Record the outcome of a single-field validator
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    /// `Ok(value)` if nothing was recorded, otherwise every recorded error
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 5 {
        return Err("Username must be at least 5 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a joint name
pub fn validate_joint_name(name: &str) -> Result<(), String> {
    let length = name.trim().chars().count();

    if length < 3 {
        return Err("Name must be at least 3 characters long".to_string());
    }

    if length > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), String> {
    match description {
        Some(text) if text.chars().count() > 1000 => {
            Err("Description must be at most 1000 characters long".to_string())
        }
        _ => Ok(()),
    }
}

pub fn validate_reason(reason: &str) -> Result<(), String> {
    let length = reason.trim().chars().count();

    if length <= 5 {
        return Err("Reason must be longer than 5 characters".to_string());
    }

    if length > 1000 {
        return Err("Reason must be at most 1000 characters long".to_string());
    }

    Ok(())
}

pub fn validate_latitude(latitude: f64) -> Result<(), String> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90 degrees".to_string());
    }
    Ok(())
}

pub fn validate_longitude(longitude: f64) -> Result<(), String> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180 degrees".to_string());
    }
    Ok(())
}

/// Validate a search radius against the protocol ceiling
///
/// The configurable operational cap is enforced separately by the proximity
/// planner.
pub fn validate_radius(radius: f64) -> Result<(), String> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err("Radius must be greater than 0".to_string());
    }

    if radius > RADIUS_CEILING_METERS {
        return Err(format!(
            "Radius must be at most {} meters",
            RADIUS_CEILING_METERS
        ));
    }

    Ok(())
}

/// Record coordinate problems and return the requested coordinate
///
/// Missing parts are recorded as errors and read as zero.
pub fn check_coordinate(
    errors: &mut FieldErrors,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Coordinate {
    match latitude {
        Some(lat) => errors.check("latitude", validate_latitude(lat)),
        None => errors.add("latitude", "Latitude is required"),
    }

    match longitude {
        Some(lon) => errors.check("longitude", validate_longitude(lon)),
        None => errors.add("longitude", "Longitude is required"),
    }

    Coordinate {
        latitude: latitude.unwrap_or_default(),
        longitude: longitude.unwrap_or_default(),
    }
}

/// Record pagination problems and return the requested page
pub fn check_page(errors: &mut FieldErrors, page: Option<u32>, page_size: Option<u32>) -> Page {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    if page < 1 {
        errors.add("page", "Page must be at least 1");
    }

    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        errors.add(
            "pageSize",
            format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
        );
    }

    Page::new(page.max(1), page_size.clamp(1, MAX_PAGE_SIZE))
}
