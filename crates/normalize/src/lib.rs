//! Text normalizers for values scraped out of human-authored markup.
//!
//! Every function here is total: input that cannot be interpreted comes back
//! as `None`, an empty list, or (for opening hours) unchanged, never as an
//! error. Callers are expected to prune missing values rather than fail.

pub mod calendar;
pub mod links;
pub mod numbers;

pub use calendar::{clock_time, iso_date, opening_hours, weekday_list, weekday_token};
pub use links::{absolute_url, email};
pub use numbers::{digits_only, phone, price, year};
