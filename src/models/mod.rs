mod attachment;
mod enums;
mod form;
mod results;

pub use attachment::{Attachment, AttachmentError};
pub use enums::{AdType, Availability, Choice, HeatingType, MarketType, OwnershipType, StateType};
pub use form::FormRecord;
pub use results::{PhotoFeedback, PriceResult};
