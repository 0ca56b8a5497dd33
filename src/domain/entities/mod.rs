pub mod campaign;
pub mod contact;
pub mod record_fields;
pub mod user;
pub mod waitlist;
