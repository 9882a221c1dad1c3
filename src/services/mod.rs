pub mod bookings;
pub mod fees;
pub mod locations;
pub mod payments;
pub mod pricing;
pub mod rates;
pub mod users;
pub mod vehicle_groups;
pub mod vehicles;
