//! Types that represent the core data model, such as `Record` and `Money`.

mod money;
mod record;

pub use money::{Money, MoneyError};
pub use record::Record;
