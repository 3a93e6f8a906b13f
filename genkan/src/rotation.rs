/// Display orientation derived from the rotation sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl Orientation {
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees {
            0 => Orientation::Portrait,
            90 => Orientation::LandscapeLeft,
            180 => Orientation::PortraitUpsideDown,
            270 => Orientation::LandscapeRight,
            _ => Orientation::Unknown,
        }
    }
}

type RotationCallback = Box<dyn FnMut(Orientation)>;

/// Routes raw rotation readings to a single registered callback.
///
/// A small state machine of its own, independent of the lifecycle core:
/// readings are de-duplicated against the last delivered orientation,
/// suppressed entirely while paused or while the external rotation lock is
/// engaged (the locked orientation is reported as Portrait), and
/// re-delivered on unlock/resume if the orientation moved meanwhile.
#[derive(Default)]
pub struct RotationRouter {
    callback: Option<RotationCallback>,
    current: Option<Orientation>,
    delivered: Option<Orientation>,
    locked: bool,
    paused: bool,
}

impl RotationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callback(&mut self, callback: impl FnMut(Orientation) + 'static) {
        self.callback = Some(Box::new(callback));
        self.delivered = None;
    }

    pub fn unset_callback(&mut self) {
        self.callback = None;
        self.delivered = None;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Current orientation; Portrait while the rotation lock is engaged.
    pub fn get_current_orientation(&self) -> Orientation {
        if self.locked {
            return Orientation::Portrait;
        }
        self.current.unwrap_or(Orientation::Unknown)
    }

    /// Stop deliveries while the application is paused.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume deliveries; catch up if the orientation moved while paused.
    pub fn resume(&mut self) {
        self.paused = false;
        self.deliver_current();
    }

    /// Engage or release the external rotation lock.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if !locked {
            self.deliver_current();
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Feed one raw sensor reading, in degrees. Unmappable readings are
    /// dropped.
    pub fn feed(&mut self, degrees: i32) {
        let orientation = Orientation::from_degrees(degrees);
        if orientation == Orientation::Unknown {
            tracing::debug!("Ignoring unmappable rotation reading: {} deg", degrees);
            return;
        }
        self.current = Some(orientation);
        self.deliver_current();
    }

    fn deliver_current(&mut self) {
        if self.locked || self.paused {
            return;
        }
        let Some(orientation) = self.current else {
            return;
        };
        if self.delivered == Some(orientation) {
            return;
        }
        if let Some(cb) = self.callback.as_mut() {
            cb(orientation);
            self.delivered = Some(orientation);
        }
    }
}
