//! Business rules. Handlers pass the verified caller id in explicitly; every write runs
//! inside its own transaction.

pub mod listing_service;
pub mod profile_service;
pub mod registration_service;

pub use listing_service::ListingService;
pub use profile_service::ProfileService;
pub use registration_service::RegistrationService;
