//! # talkback_core
//!
//! Core relay logic for Talkback.
//!
//! A chat message is sent to a completion provider; the reply text is then,
//! when a video provider is configured, turned into a talking-avatar clip by
//! submitting a synthesis job and polling it until it settles.

pub mod completion;
pub mod relay;
pub mod video;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
