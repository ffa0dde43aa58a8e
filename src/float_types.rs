// Re-export parry for the appropriate float size
#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;
#[cfg(feature = "f32")]
pub use parry3d;

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

/// Tolerance used by plane classification and ray tests.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-4;
/// Tolerance used by plane classification and ray tests.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-5;

/// Default weld distance for positions, in model units.
pub const POSITION_WELD_DISTANCE: Real = 0.01;

/// Normals are quantized to this many steps per unit before welding.
pub const NORMAL_QUANTIZATION: Real = 128.0;

/// Weld tolerance for (quantized) normals.
pub const NORMAL_WELD_TOLERANCE: Real = 0.008;

/// Weld tolerance for texture coordinates, roughly half a texel at 1k.
pub const TEXCOORD_WELD_TOLERANCE: Real = 1.0 / 2048.0;

/// Weld tolerance for vertex colors, a quarter of an 8-bit step.
pub const COLOR_WELD_TOLERANCE: Real = 1.0 / (4.0 * 256.0);
