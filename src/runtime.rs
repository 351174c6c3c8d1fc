//! Graphics runtime boundary
//!
//! The harness drives a windowing/audio/drawing stack it does not
//! implement. [`GraphicsRuntime`] is that boundary: real integrations
//! implement it over their graphics bindings, and [`HeadlessRuntime`]
//! implements it as a call recorder for tests and headless runs.

/// RGBA color passed to the clear call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
}

/// Window, audio, and drawing primitives the frame loop calls into
pub trait GraphicsRuntime {
    fn init_window(&mut self, width: u32, height: u32, title: &str);

    fn set_window_size(&mut self, width: u32, height: u32);

    fn set_window_title(&mut self, title: &str);

    /// True once the user asked the window to close; checked before
    /// every frame
    fn window_should_close(&self) -> bool;

    fn close_window(&mut self);

    fn init_audio(&mut self);

    fn close_audio(&mut self);

    fn set_target_fps(&mut self, fps: u32);

    fn begin_drawing(&mut self);

    fn clear_background(&mut self, color: Color);

    fn end_drawing(&mut self);
}

/// Call-recording runtime for tests and headless runs.
///
/// Every call is appended to `calls` in order; the interesting ones are
/// also kept in typed form. An optional frame budget makes
/// `window_should_close` report true after that many frames have been
/// drawn, which is how bounded headless runs terminate.
#[derive(Debug, Default)]
pub struct HeadlessRuntime {
    frame_budget: Option<u64>,
    frames_drawn: u64,

    /// Ordered record of every runtime call
    pub calls: Vec<String>,

    /// Current window size, set by init and resize calls
    pub window_size: Option<(u32, u32)>,

    /// Current window title, set by init and rename calls
    pub window_title: Option<String>,

    /// Arguments of every resize call
    pub resize_calls: Vec<(u32, u32)>,

    /// Arguments of every rename call
    pub title_calls: Vec<String>,
}

impl HeadlessRuntime {
    /// Runtime whose window never asks to close
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime whose window asks to close after `frames` drawn frames
    pub fn with_frame_budget(frames: u64) -> Self {
        Self {
            frame_budget: Some(frames),
            ..Self::default()
        }
    }

    /// Frames fully drawn so far
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl GraphicsRuntime for HeadlessRuntime {
    fn init_window(&mut self, width: u32, height: u32, title: &str) {
        self.window_size = Some((width, height));
        self.window_title = Some(title.to_string());
        self.calls.push(format!("init_window {}x{} \"{}\"", width, height, title));
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = Some((width, height));
        self.resize_calls.push((width, height));
        self.calls.push(format!("set_window_size {}x{}", width, height));
    }

    fn set_window_title(&mut self, title: &str) {
        self.window_title = Some(title.to_string());
        self.title_calls.push(title.to_string());
        self.calls.push(format!("set_window_title \"{}\"", title));
    }

    fn window_should_close(&self) -> bool {
        matches!(self.frame_budget, Some(budget) if self.frames_drawn >= budget)
    }

    fn close_window(&mut self) {
        self.calls.push("close_window".to_string());
    }

    fn init_audio(&mut self) {
        self.calls.push("init_audio".to_string());
    }

    fn close_audio(&mut self) {
        self.calls.push("close_audio".to_string());
    }

    fn set_target_fps(&mut self, fps: u32) {
        self.calls.push(format!("set_target_fps {}", fps));
    }

    fn begin_drawing(&mut self) {
        self.calls.push("begin_drawing".to_string());
    }

    fn clear_background(&mut self, color: Color) {
        self.calls.push(format!(
            "clear_background {} {} {} {}",
            color.r, color.g, color.b, color.a
        ));
    }

    fn end_drawing(&mut self) {
        self.frames_drawn += 1;
        self.calls.push("end_drawing".to_string());
    }
}
