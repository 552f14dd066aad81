//! Core of the Tendrils terminal client: session tracking, turn discovery,
//! scripted tactics, and the autonomous play loop. The server owns all
//! combat rules; this crate only synchronizes with it and decides what to
//! submit next.

pub mod autoplay;
pub mod gateway;
pub mod http;
pub mod presets;
pub mod resolver;
pub mod session;
pub mod snapshot;
pub mod tactics;
pub mod wire;

pub use autoplay::{AutoPlayConfig, GameOutcome, PlayEvent, PlayOutcome};
pub use gateway::{ActionRequest, ActionResult, Gateway, GatewayError};
pub use http::HttpGateway;
pub use session::Session;
pub use snapshot::{CharacterSnapshot, GameSnapshot, GameStatus, GridPos, MatchSnapshot};
