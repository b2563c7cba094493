pub mod macros;

pub mod account;
pub mod bls;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod logger;
pub mod merkle;
pub mod networks;
pub mod record;
pub mod validator;
