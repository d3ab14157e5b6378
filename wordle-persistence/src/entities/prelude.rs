pub use super::daily_tallies::Entity as DailyTallies;
pub use super::guess_records::Entity as GuessRecords;
pub use super::users::Entity as Users;
pub use super::words::Entity as Words;
