pub mod dashboard;
pub mod db;
pub mod editor;
pub mod settings;
pub mod transfer;
