//! Radial 24-hour chart engine
//!
//! [`RadialChart`] binds a date and list to a host surface and turns the
//! day's schedules into a [`ChartScene`]. Hosts feed it pointer input and
//! timer polls and listen for [`ChartEvent`](crate::events::ChartEvent)s.

pub mod layout;
pub mod renderer;
pub mod scene;

pub use layout::{minutes_segment, ring_segment, Bounds, ChartLayout, Point};
pub use renderer::{RadialChart, SurfaceHost, TimerAction};
pub use scene::{palette, ArcShape, ArcTarget, ChartScene, DragPreview, Label, Ray, TickMark, Tooltip};
