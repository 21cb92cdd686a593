pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{SlotStatus, TimeSlot};
pub use services::generator::SlotGenerator;
pub use services::lifecycle::SlotLifecycle;
pub use services::slots::SlotService;
