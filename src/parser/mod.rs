//! Export parsing: header grammars, chat segmentation, normalization, and the
//! JSON extractors for account, location, and browser history exports.

pub mod account;
pub mod browser;
pub mod chat;
pub mod fallback;
pub mod grammar;
pub mod location;
pub mod normalize;
pub mod segment;
