// handlers/mod.rs
//
// Public (no auth): GET /api/ideas, GET /api/ideas/:id, GET /health
// Protected (JWT auth): POST /api/ideas, PUT /api/ideas/:id, DELETE /api/ideas/:id

pub mod health;
pub mod ideas;

pub use health::health;
