//=========================================================================
// Headless Collaborators
//=========================================================================
//
// Backend and settings implementations with no window, GPU or disk.
// Used for tests, servers and tools that drive the loop without a
// surface.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{RenderBackend, SettingsStore};

//=== HeadlessRenderer ====================================================

/// Render backend that only counts what it is asked to do.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeadlessRenderer {
    clears: u64,
    frames: u64,
    surface: Option<(u32, u32)>,
    surface_losses: u32,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames
    }

    /// Current surface size, `None` while no surface exists.
    pub fn surface(&self) -> Option<(u32, u32)> {
        self.surface
    }

    pub fn surface_losses(&self) -> u32 {
        self.surface_losses
    }
}

impl RenderBackend for HeadlessRenderer {
    fn clear_frame(&mut self) {
        self.clears += 1;
    }

    fn frame_complete(&mut self) {
        self.frames += 1;
    }

    fn surface_available(&mut self, width: u32, height: u32) {
        debug!(target: "render", "Headless surface {}x{}", width, height);
        self.surface = Some((width, height));
    }

    fn surface_lost(&mut self) {
        self.surface = None;
        self.surface_losses += 1;
    }
}

//=== MemorySettings ======================================================

/// Settings store kept in memory; `flush` just clears the dirty flag and
/// counts how often it happened.
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    values: HashMap<String, i64>,
    dirty: bool,
    flushes: u32,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl SettingsStore for MemorySettings {
    fn read(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn write(&mut self, key: &str, value: i64) {
        if self.values.insert(key.to_owned(), value) != Some(value) {
            self.dirty = true;
        }
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn flush(&mut self) {
        if self.dirty {
            debug!(target: "settings", "Flushing {} settings", self.values.len());
        }
        self.dirty = false;
        self.flushes += 1;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
