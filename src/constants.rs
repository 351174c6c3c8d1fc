// hotloop constants
//
// Shared constants for the harness live here rather than scattered
// through the subsystems.

/// Frame loop pacing
pub mod frame {
    /// Target frame rate for the render loop
    pub const TARGET_FPS: u32 = 60;
}

/// Rendering
pub mod render {
    use crate::runtime::Color;

    /// Clear color applied at the start of every frame
    pub const BACKGROUND: Color = Color::WHITE;
}

/// Game module ABI
pub mod module_api {
    /// Expected value of the `game_api_version` export
    pub const GAME_API_VERSION: u32 = 1;

    /// Symbol returning the module's API version
    pub const API_VERSION_SYMBOL: &[u8] = b"game_api_version\0";

    /// Symbol constructing the module instance
    pub const CREATE_SYMBOL: &[u8] = b"game_create\0";

    /// Symbol destroying the module instance
    pub const DESTROY_SYMBOL: &[u8] = b"game_destroy\0";
}

/// File watching
pub mod watch {
    /// Default debounce window for change notifications, in milliseconds
    pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
}
