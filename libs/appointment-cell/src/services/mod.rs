pub mod appointment;
pub mod encounter;

pub use appointment::AppointmentService;
pub use encounter::EncounterService;
