// Protected handlers: every route here sits behind
// `jwt_auth_middleware`, which guarantees an `AuthUser` extension with
// the caller's user id and tenant id.
pub mod auth;
pub mod contacts;
