// handlers/mod.rs - Two-tier handler architecture
//
// Public (no auth) → Protected (JWT auth). Every protected handler re-checks
// the caller's identity before delegating to the task repository, which
// checks it again on its own.
pub mod public;    // Tier 1: No authentication required (/, /health)
pub mod protected; // Tier 2: JWT authentication required (/api/*)
