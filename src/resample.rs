//! Maps source frames (30 per second) onto runtime ticks (20 per second).

use serde::{Deserialize, Serialize};

use crate::CameraKeyframe;

use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Timebase {
    pub source_fps: f64,
    pub tick_rate: f64,
}

impl Default for Timebase {
    fn default() -> Self {
        Self {
            source_fps: 30.,
            tick_rate: 20.,
        }
    }
}

impl Timebase {
    pub fn tick(&self, frame: u32) -> u32 {
        (f64::from(frame) / self.source_fps * self.tick_rate).floor() as u32
    }
}

/// The keyframe chosen for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSample {
    /// Position of the keyframe in file order.
    pub index: usize,
    pub suppress_easing: bool,
}

/// State of a single resampling pass.
#[derive(Debug, Default)]
pub struct Resampler {
    timebase: Timebase,
    skip_easing: bool,
    ticks: BTreeMap<u32, TickSample>,
}

impl Resampler {
    pub fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            ..Default::default()
        }
    }

    /// Feeds the keyframe at `index`. Must be called in file order.
    fn push(&mut self, keyframes: &[CameraKeyframe], index: usize) {
        let frame = keyframes[index].frame;
        if index > 0 && index + 1 < keyframes.len() {
            let prev = keyframes[index - 1].frame;
            if i64::from(prev) - i64::from(frame) == -1 {
                self.skip_easing = true;
            }
        }

        let tick = self.timebase.tick(frame);
        if self.ticks.contains_key(&tick) {
            return;
        }
        let suppress_easing = std::mem::replace(&mut self.skip_easing, false);
        self.ticks.insert(
            tick,
            TickSample {
                index,
                suppress_easing,
            },
        );
    }

    /// Picks one keyframe per tick.
    ///
    /// The first keyframe in file order to land on a tick wins, later ones
    /// are dropped. When a keyframe follows its predecessor by exactly one
    /// frame, the next keyframe that claims a tick (possibly itself) loses
    /// its easing.
    pub fn resample(mut self, keyframes: &[CameraKeyframe]) -> BTreeMap<u32, TickSample> {
        for index in 0..keyframes.len() {
            self.push(keyframes, index);
        }
        self.ticks
    }
}

pub fn resample(timebase: &Timebase, keyframes: &[CameraKeyframe]) -> BTreeMap<u32, TickSample> {
    Resampler::new(*timebase).resample(keyframes)
}
