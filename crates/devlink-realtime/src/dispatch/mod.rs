//! Best-effort event dispatch.

pub mod dispatcher;
pub mod event;

pub use dispatcher::EventDispatcher;
pub use event::{DeliveryReport, DispatchTarget, EventAddress, EventPayload};
