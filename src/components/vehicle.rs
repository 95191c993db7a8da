use bevy_ecs::prelude::Component;

/// Animated marker keyed by a stable identifier.
#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Vehicle {
    pub id: String,
}

impl Vehicle {
    pub fn new(id: impl Into<String>) -> Self {
        Vehicle { id: id.into() }
    }
}
