mod landmark;
mod scripted;
mod ssd;

#[cfg(feature = "backend-tract")]
pub use landmark::{LandmarkHandBackend, DEFAULT_MIN_CONFIDENCE};
pub use scripted::{ScriptedHands, ScriptedPersons};
#[cfg(feature = "backend-tract")]
pub use ssd::SsdPersonBackend;
