pub mod currency;
pub mod holding;
pub mod outcome;
pub mod portfolio;
pub mod rates;
pub mod settings;
pub mod snapshot;
