//! Virtual joystick
//!
//! Pointer and touch events arrive asynchronously relative to the frame loop;
//! they only ever overwrite the stick vector, and the frame reads whatever was
//! written last.

use glam::Vec2;

/// Screen-space circle the stick knob travels within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickBase {
    pub center: Vec2,
    pub radius: f32,
}

impl StickBase {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Build from a bounding client rect (left, top, width, height)
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(left + width / 2.0, top + height / 2.0),
            radius: width / 2.0,
        }
    }

    /// Knob offset in pixels, clamped to the base radius
    pub fn knob_offset(&self, pointer: Vec2) -> Vec2 {
        (pointer - self.center).clamp_length_max(self.radius.max(0.0))
    }

    /// Normalized deflection inside the unit disc
    pub fn deflection(&self, pointer: Vec2) -> Vec2 {
        if self.radius <= 0.0 {
            return Vec2::ZERO;
        }
        self.knob_offset(pointer) / self.radius
    }
}

#[derive(Debug, Clone, Default)]
pub struct Joystick {
    dragging: bool,
    vector: Vec2,
    knob: Vec2,
}

impl Joystick {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down / touch start on the stick area
    pub fn press(&mut self, base: &StickBase, pointer: Vec2) {
        self.dragging = true;
        self.track(base, pointer);
    }

    /// Pointer move; ignored unless a drag is in progress
    pub fn drag(&mut self, base: &StickBase, pointer: Vec2) -> bool {
        if !self.dragging {
            return false;
        }
        self.track(base, pointer);
        true
    }

    /// Pointer up / touch end: recenter
    pub fn release(&mut self) {
        self.dragging = false;
        self.vector = Vec2::ZERO;
        self.knob = Vec2::ZERO;
    }

    fn track(&mut self, base: &StickBase, pointer: Vec2) {
        self.knob = base.knob_offset(pointer);
        self.vector = base.deflection(pointer);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn vector(&self) -> Vec2 {
        self.vector
    }

    pub fn knob_offset(&self) -> Vec2 {
        self.knob
    }
}
