use bevy_ecs::prelude::Component;

/// Fixed map marker (plant, depot, pickup point). Never moves.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Facility {
    pub label: String,
}

impl Facility {
    pub fn new(label: impl Into<String>) -> Self {
        Facility {
            label: label.into(),
        }
    }
}
