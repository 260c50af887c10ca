//! Where the live look sensitivity comes from.

use strike_config::InputConfig;

/// A live look-sensitivity multiplier, read once per look event.
pub trait SensitivitySource {
    fn sensitivity(&self) -> f32;
}

impl SensitivitySource for f32 {
    fn sensitivity(&self) -> f32 {
        *self
    }
}

impl SensitivitySource for InputConfig {
    fn sensitivity(&self) -> f32 {
        self.sensitivity
    }
}

impl<T: SensitivitySource + ?Sized> SensitivitySource for &T {
    fn sensitivity(&self) -> f32 {
        (**self).sensitivity()
    }
}
