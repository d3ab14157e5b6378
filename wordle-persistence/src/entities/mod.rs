pub mod prelude;

pub mod daily_tallies;
pub mod guess_records;
pub mod users;
pub mod words;
