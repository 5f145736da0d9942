#![allow(unused_imports)]

pub use super::interaction::Entity as Interaction;
pub use super::track::Entity as Track;
pub use super::user::Entity as User;
