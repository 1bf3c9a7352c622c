pub mod carousel;
pub mod errors;
pub mod listing;
pub mod otp;
pub mod phone;
pub mod session;

pub use carousel::*;
pub use errors::*;
pub use listing::*;
pub use otp::*;
pub use phone::*;
pub use session::*;
