// Handlers are split by security tier:
// public (no token) and protected (bearer token verified by jwt_auth_middleware).
pub mod protected;
pub mod public;
