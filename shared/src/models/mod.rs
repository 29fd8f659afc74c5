//! Domain Models
//!
//! One module per entity, each with the entity struct plus Create/Update
//! payloads. Status fields are closed enums stored as TEXT.

pub mod clocking;
pub mod employee;
pub mod incident;
pub mod invoice;
pub mod order;
pub mod product;
pub mod settings;
pub mod sync_log;

// Re-exports
pub use clocking::{ClockKind, Clocking, ClockingCreate, ClockingUpdate};
pub use employee::{Employee, EmployeeCreate, EmployeeRole, EmployeeUpdate};
pub use incident::{
    Incident, IncidentComment, IncidentCommentCreate, IncidentCreate, IncidentPriority,
    IncidentStatus, IncidentUpdate,
};
pub use invoice::{Invoice, InvoiceStatus};
pub use order::{
    DeliveryMethod, Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderUpdate,
    OrderWithItems,
};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use settings::{Settings, SettingsUpdate};
pub use sync_log::{SyncLog, SyncLogCreate};
