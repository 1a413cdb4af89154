// Frame scheduling primitives shared by both effects. Timestamps are the
// millisecond values handed to requestAnimationFrame / Event.timeStamp.

/// Skips frames that arrive sooner than `interval_ms` after the last one run.
#[derive(Clone, Copy, Debug)]
pub struct FrameThrottle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn should_run(&mut self, timestamp_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if timestamp_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(timestamp_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Leading-edge rate limit for high-frequency input events.
#[derive(Clone, Copy, Debug)]
pub struct EventThrottle {
    min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl EventThrottle {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    pub fn admit(&mut self, timestamp_ms: f64) -> bool {
        if let Some(last) = self.last_ms {
            // timestamps can go backwards across event sources
            if timestamp_ms >= last && timestamp_ms - last < self.min_interval_ms {
                return false;
            }
        }
        self.last_ms = Some(timestamp_ms);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCommand {
    Start,
    Stop,
    Keep,
}

/// Visibility predicate for a cooperative frame loop.
///
/// The host asks the gate before every frame; a hidden gate refuses the frame
/// and the loop stops requesting further ones until visibility returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameGate {
    visible: bool,
    running: bool,
    halted: bool,
    frames_drawn: u64,
}

impl FrameGate {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Record a visibility change and say what the loop should do about it.
    pub fn set_visible(&mut self, visible: bool) -> LoopCommand {
        self.visible = visible;
        if self.halted {
            return LoopCommand::Keep;
        }
        match (visible, self.running) {
            (true, false) => {
                self.running = true;
                LoopCommand::Start
            }
            (false, true) => {
                self.running = false;
                LoopCommand::Stop
            }
            _ => LoopCommand::Keep,
        }
    }

    /// Ask to start the loop now (mount). Returns `Start` only when visible.
    pub fn kick(&mut self) -> LoopCommand {
        if self.halted || self.running || !self.visible {
            return LoopCommand::Keep;
        }
        self.running = true;
        LoopCommand::Start
    }

    /// Called at the top of each frame callback. `false` means do no drawing
    /// and do not request another frame.
    pub fn begin_frame(&mut self) -> bool {
        if self.halted || !self.visible {
            self.running = false;
            return false;
        }
        self.running = true;
        true
    }

    pub fn frame_drawn(&mut self) {
        self.frames_drawn += 1;
    }

    pub fn halt(&mut self) {
        self.halted = true;
        self.running = false;
    }
}
