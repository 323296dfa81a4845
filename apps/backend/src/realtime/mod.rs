//! Push-based snapshot delivery and the optimistic client mirror.

pub mod client;
pub mod hub;
pub mod mirror;
pub mod subscription;

pub use client::ClientSession;
pub use hub::SessionHub;
pub use mirror::{EditState, OptimisticMirror};
pub use subscription::{Subscription, SubscriptionHandle};
