pub mod currency;
pub mod error;
pub mod i18n;
