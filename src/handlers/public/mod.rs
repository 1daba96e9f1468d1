// Public handlers: token acquisition only. Everything here must
// validate its own input - there is no trusted caller context.
pub mod auth;
