//! Framework-independent player logic: the session state machine, transport
//! arithmetic and the media element port it drives.

pub mod media;
pub mod session;
pub mod transport;

pub use media::MediaElement;
pub use session::{ParentRequest, PlaybackSession, RenderInputs};
pub use transport::{ControlRole, ScrubGesture};
