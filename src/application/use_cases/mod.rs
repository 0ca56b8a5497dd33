pub mod auth;
pub mod campaign;
pub mod contact;
pub mod demo;
pub mod waitlist;
