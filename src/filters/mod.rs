pub mod evaluate;
pub mod parser;
pub mod spec;

pub use evaluate::{filter_records, matches, start_of_day};
pub use parser::parse_query;
pub use spec::{DayZone, FilterSpec, FilterSpecBuilder};
