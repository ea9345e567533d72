//! Route-to-scene orchestration: which camera vantage belongs to which page,
//! and when the switch is allowed to happen.

pub mod camera_table;
pub mod navigation;
pub mod routes;
pub mod scene_key;
pub mod scroll;
pub mod store;

mod navigation_tests;

pub use camera_table::CameraStateTable;
pub use navigation::{NavigationController, NavigationOutcome, RouteCommitted};
pub use routes::RouteTable;
pub use scene_key::SceneKey;
pub use scroll::{ScrollDriver, ScrollEvent};
pub use store::{CameraStore, CameraStoreState, SubscriptionId};
