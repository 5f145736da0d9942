pub mod interaction;
pub mod profile;
pub mod track;
