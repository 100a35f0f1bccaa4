// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/* (e.g., /api/auth/*, /api/tasks/*, /api/rpc/*)
// Middleware: jwt_auth_middleware attaches the verified AuthUser
//
// Handlers extract a RequestContext and call require_user_id before doing
// anything else. The repository repeats that check, so removing either layer
// still leaves one guard in place.

pub mod auth;  // Caller identity
pub mod tasks; // Task CRUD, live list and RPC dispatch
