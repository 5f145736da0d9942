pub mod prelude;

pub mod interaction;
pub mod track;
pub mod user;
