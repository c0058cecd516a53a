pub mod analysis;
pub mod db;
pub mod settings;
pub mod tournament;
