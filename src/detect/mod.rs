mod backend;
mod backends;
pub mod decode;
mod result;

pub use backend::{HandLocator, PersonDetector};
#[cfg(feature = "backend-tract")]
pub use backends::{LandmarkHandBackend, SsdPersonBackend};
pub use backends::{ScriptedHands, ScriptedPersons};
pub use result::{
    landmarks, HandInstance, Keypoint, PersonBox, HAND_CONNECTIONS, HAND_LANDMARK_COUNT,
};
