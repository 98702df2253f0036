pub mod apparel;
pub mod colors;
pub mod file_action;
pub mod profile;

// Re-export apparel questions
pub use apparel::{apparel, secret};

// Re-export colors questions
pub use colors::{favorite_color, favorite_numbers};

// Re-export file_action questions
pub use file_action::file_action;

// Re-export profile questions and survey
pub use profile::{Profile, age, name, profile_survey, smoke};
