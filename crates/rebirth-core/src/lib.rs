//! Rebirth Core - session engine over the pure life-generation logic
//!
//! Wraps `rebirth-logic` with everything that touches the outside world:
//! storage, the export/import document, and the wall-clock journey driver.
//!
//! # Architecture
//!
//! - **Store**: [`persistence::GameStore`] is injected into the session;
//!   [`persistence::MemoryStore`] for tests, [`persistence::FileStore`] on disk
//! - **Session**: [`engine::GameSession`] issues the presentation commands
//!   (generate, start/advance/resolve/reset journey, quick stats)
//! - **Ticker**: [`ticker::JourneyTicker`] turns elapsed milliseconds into years
//!
//! # Example
//!
//! ```rust
//! use rebirth_core::prelude::*;
//!
//! let settings = GameSettings { seed: Some(42), ..GameSettings::default() };
//! let mut session = GameSession::new(MemoryStore::new(), settings, 0);
//!
//! let generation = session.generate(GameMode::Classic, 1).unwrap();
//! session.start_journey(&generation.life.result.id).unwrap();
//! session.advance_journey().unwrap();
//! assert_eq!(session.quick_stats().total_lives, 1);
//! ```

pub mod engine;
pub mod export;
pub mod persistence;
pub mod ticker;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{GameSession, Generation, QuickStats, SessionError};
    pub use crate::persistence::{FileStore, GameStore, MemoryStore};
    pub use rebirth_logic::modes::GameMode;
    pub use rebirth_logic::settings::GameSettings;
}

/// Milliseconds since the Unix epoch, for callers that stamp real time.
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
