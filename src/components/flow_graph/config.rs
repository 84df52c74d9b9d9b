//! Tunable layout, simulation, zoom and theme settings.
//!
//! Every field has a default; a host page may override any subset by embedding
//! JSON in a `graph-config` script element.

use serde::Deserialize;

use super::collision::SimulationParameters;
use super::metrics::CardMetrics;
use super::state::ZoomLimits;
use super::theme::ThemeName;

/// All settings for one diagram.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlowGraphConfig {
	pub metrics: CardMetrics,
	pub simulation: SimulationParameters,
	pub zoom: ZoomLimits,
	pub theme: ThemeName,
}
