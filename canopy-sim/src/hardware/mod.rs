//! Physical inputs to a simulation: the room and the fixtures mounted in it

pub mod fixture;
pub mod room;

pub use fixture::{Fixture, FixtureError, FixtureModel, SpectralMix};
pub use room::{Room, RoomError, SurfaceReflectance};
