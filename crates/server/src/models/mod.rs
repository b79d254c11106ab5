//! Domain and row types for the server.

pub mod identity;
pub mod order;
pub mod product;
pub mod profile;
pub mod session;
pub mod working_hour;

pub use identity::Identity;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderUpdate, OrderWithItems};
pub use product::{NewProduct, Product, ProductUpdate};
pub use profile::{Profile, ProfileUpdate};
pub use session::{CurrentUser, session_keys};
pub use working_hour::{WorkingHour, WorkingHourUpdate};
