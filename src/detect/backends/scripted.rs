//! Scripted backends for headless tests and the demo binary.
//!
//! Each call pops the next scripted result; once the script is exhausted the
//! backend reports nothing found, which is how live backends degrade too.

use std::collections::VecDeque;

use anyhow::Result;

use crate::detect::backend::{HandLocator, PersonDetector};
use crate::detect::result::{HandInstance, PersonBox};
use crate::frame::Frame;

/// Hand locator that replays a fixed per-frame script.
pub struct ScriptedHands {
    script: VecDeque<Vec<HandInstance>>,
}

impl ScriptedHands {
    pub fn new(script: Vec<Vec<HandInstance>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// A locator that never finds a hand.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl HandLocator for ScriptedHands {
    fn name(&self) -> &'static str {
        "scripted-hands"
    }

    fn locate(&mut self, _frame: &Frame) -> Result<Vec<HandInstance>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

/// Person detector that replays a fixed per-frame script.
pub struct ScriptedPersons {
    script: VecDeque<Vec<PersonBox>>,
}

impl ScriptedPersons {
    pub fn new(script: Vec<Vec<PersonBox>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl PersonDetector for ScriptedPersons {
    fn name(&self) -> &'static str {
        "scripted-persons"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<PersonBox>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::Keypoint;

    #[test]
    fn scripts_replay_in_order_then_degrade_to_empty() {
        let frame = Frame::new(vec![0u8; 4 * 4 * 3], 4, 4).unwrap();
        let mut hands = ScriptedHands::new(vec![
            vec![HandInstance::new(vec![Keypoint::new(1, 1)])],
            Vec::new(),
        ]);

        assert_eq!(hands.locate(&frame).unwrap().len(), 1);
        assert!(hands.locate(&frame).unwrap().is_empty());
        // Exhausted script keeps reporting nothing found.
        assert!(hands.locate(&frame).unwrap().is_empty());
    }
}
