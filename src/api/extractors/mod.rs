pub mod drink_id;
pub mod permission;

pub use drink_id::DrinkId;
pub use permission::Authorized;
