//! Local input validators
//!
//! Synchronous checks that run before any network call.

pub mod disability_category;
pub mod id_number;
pub mod image_input;

pub use disability_category::{validate_category, CategoryValidation};
pub use id_number::normalize_id_number;
pub use image_input::{check_image, check_optional_image, CheckedImage};
