pub use shared::risk::{classify, RiskLevel, RiskSample};
pub use shared::{Coordinate, ManeuverKind, RouteDescriptor, RouteStep, SafePlace};
