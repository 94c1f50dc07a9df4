use bevy::prelude::*;

/// Circle drawn for body `index` of the running [`BodySet`](crate::physics::BodySet).
#[derive(Component, Clone, Copy, Debug)]
pub struct BodySprite {
    pub index: usize,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct BarSprite {
    pub bin_index: usize,
}
