pub mod booking;
pub mod draft;
pub mod location;
pub mod luggage;
pub mod payment;
