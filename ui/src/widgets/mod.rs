mod error_banner;
mod table;

pub use error_banner::ErrorBanner;
pub use table::{token_change_table, token_table};
