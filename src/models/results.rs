use serde::{Deserialize, Serialize};

/// Estimated price in PLN as returned by the estimate endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResult(pub i64);

impl PriceResult {
    /// Price the service returns when it cannot resolve the address
    pub const UNRESOLVED_ADDRESS: PriceResult = PriceResult(-1);

    pub fn is_unresolved_address(self) -> bool {
        self == Self::UNRESOLVED_ADDRESS
    }

    /// True until the first successful estimate arrives
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Qualitative feedback for the uploaded photos.
///
/// A score of 0 means no feedback has been received yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFeedback {
    /// Attractiveness on a 0-10 scale
    pub score: u8,
    pub reason: String,
    pub pros: Vec<String>,
    pub to_fix: Vec<String>,
    /// Suggested listing description
    pub description: String,
}

impl PhotoFeedback {
    pub const MAX_SCORE: u8 = 10;

    pub fn is_empty(&self) -> bool {
        self.score == 0
    }
}
