//! Searchable stop/gym and quest lists for the map page, and the icon each point shows.

pub mod core;
mod error;

pub use crate::core::bounds::{LatLng, LatLngBounds, Viewport};
pub use crate::core::catalog::{build_gym_catalog, build_stop_catalog, CatalogContext};
pub use crate::core::data::{Icon, Kind, PointOfInterest, RaidState};
pub use crate::core::json::JsonSnapshot;
pub use crate::core::lookup::{GymTraits, Lookups, RecordGymTraits};
pub use crate::core::render::{
    list_points, render_list, Container, Document, HighlightSession, ListKind, ListRequest,
    MapWidget,
};
pub use error::FinderError;
