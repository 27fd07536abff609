pub mod history;
pub mod killers;

pub use history::HistoryTable;
pub use killers::KillerTable;
