//! Interaction state for browser-side components, kept free of any rendering
//! or transport so it can be driven from tests or an embedding front-end.

pub mod filter_bar;
pub mod history;
pub mod rate_limit;
pub mod results_feed;
pub mod search_box;
pub mod storage;
pub mod toast;
