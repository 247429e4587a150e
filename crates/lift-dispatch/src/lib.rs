//! `lift-dispatch` — request-assignment policies.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                    |
//! |--------------------|-------------------------------------------------------------|
//! | [`snapshot`]       | `FleetSnapshot`, `UnitView` — read-only fleet state         |
//! | [`policy`]         | `DispatchPolicy` trait, `Decision`, `Explanation`, `PolicyKind` |
//! | [`weighted`]       | `WeightedFactorPolicy`, `FactorBreakdown`                   |
//! | [`shortest_queue`] | `ShortestQueuePolicy`                                       |
//! | [`rotating`]       | `RotatingPolicy`, `RotationCursor`                          |
//! | [`error`]          | `DispatchError`, `DispatchResult<T>`                        |
//!
//! # Design notes
//!
//! Every policy is a pure function of `(&FleetSnapshot, &Request, &mut State)`.
//! The snapshot is an owned copy taken once per submission, so all three
//! policies score the same point in time and none of them can mutate the
//! fleet.  Per-policy carry state (only the rotation cursor today) lives
//! outside the policy value, which keeps the policies `Send + Sync` and lets
//! the coordinator evaluate them side by side.

pub mod error;
pub mod policy;
pub mod rotating;
pub mod shortest_queue;
pub mod snapshot;
pub mod weighted;

#[cfg(test)]
mod tests;

pub use error::{DispatchError, DispatchResult};
pub use policy::{Decision, DispatchPolicy, Explanation, PolicyKind};
pub use rotating::{RotatingPolicy, RotationCursor};
pub use shortest_queue::ShortestQueuePolicy;
pub use snapshot::{FleetSnapshot, UnitView};
pub use weighted::{FactorBreakdown, WeightedFactorPolicy};
