//! Request handlers, one module per resource.

pub mod leads;
pub mod notification;
