//! Hardware and network adapters for the strip controller

pub(crate) mod broker;
pub(crate) mod drivers;
pub(crate) mod tasks;
