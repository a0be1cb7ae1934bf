//! Types shared between the minigolf server and its clients.
//!
//! Wire types derive `ts_rs::TS`; `cargo test -p minigolf-shared` writes the
//! TypeScript bindings to `shared/bindings/`.

pub mod config;
pub mod level;
pub mod protocol;
pub mod vec2;
