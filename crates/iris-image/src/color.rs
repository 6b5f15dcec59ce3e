//! Drawing colors, BGR byte order (see [`Image`](crate::Image) channel
//! order notes).

pub const RED: [f64; 3] = [0.0, 0.0, 255.0];
pub const GREEN: [f64; 3] = [0.0, 255.0, 0.0];
pub const BLUE: [f64; 3] = [255.0, 0.0, 0.0];
pub const BLACK: [f64; 3] = [0.0, 0.0, 0.0];
pub const WHITE: [f64; 3] = [255.0, 255.0, 255.0];
pub const YELLOW: [f64; 3] = [0.0, 255.0, 255.0];
pub const MAGENTA: [f64; 3] = [255.0, 0.0, 255.0];
pub const CYAN: [f64; 3] = [255.0, 255.0, 0.0];
pub const GRAY: [f64; 3] = [128.0, 128.0, 128.0];
pub const ORANGE: [f64; 3] = [0.0, 128.0, 255.0];
pub const PURPLE: [f64; 3] = [128.0, 0.0, 128.0];
pub const BROWN: [f64; 3] = [42.0, 42.0, 165.0];
pub const PINK: [f64; 3] = [147.0, 20.0, 255.0];
