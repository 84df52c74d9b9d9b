//! Interactive flow graph diagram component.
//!
//! Renders a directed graph of nodes with named input/output ports on an HTML
//! canvas:
//! - Initial left-to-right placement from graph topology alone
//! - Overlap removal via a cooling, damped collision simulation
//! - Pan, zoom, and node dragging; dragged nodes are pinned obstacles
//!
//! # Example
//!
//! ```ignore
//! use flow_graph::{FlowConnection, FlowGraphCanvas, FlowNode, GraphData};
//!
//! let data = GraphData {
//!     title: "pipeline".into(),
//!     nodes: vec![
//!         FlowNode::new("read", Vec::<String>::new(), ["bytes"]),
//!         FlowNode::new("decode", ["bytes"], ["frames"]),
//!     ],
//!     connections: vec![FlowConnection::new("read", "bytes", "decode", "bytes")],
//! };
//!
//! view! { <FlowGraphCanvas data=data fullscreen=true /> }
//! ```

pub mod collision;
mod component;
pub mod config;
mod error;
pub mod metrics;
pub mod model;
pub mod placement;
mod render;
pub mod state;
pub mod theme;
mod types;

pub use component::FlowGraphCanvas;
pub use config::FlowGraphConfig;
pub use error::FlowGraphError;
pub use state::FlowGraphState;
pub use theme::{Theme, ThemeName};
pub use types::{FlowConnection, FlowNode, GraphData};
