pub mod authcode;
pub mod cleanup;
pub mod ratelimit;
pub mod token;
