//! Binary sensor taxonomies.

define_taxonomy!(
    /// Presentation class of a binary sensor.
    BinarySensorClass("binary sensor device class") {
        Battery => "battery",
        BatteryCharging => "battery_charging",
        CarbonMonoxide => "carbon_monoxide",
        Cold => "cold",
        Connectivity => "connectivity",
        Door => "door",
        GarageDoor => "garage_door",
        Gas => "gas",
        Heat => "heat",
        Light => "light",
        Lock => "lock",
        Moisture => "moisture",
        Motion => "motion",
        Moving => "moving",
        Occupancy => "occupancy",
        Opening => "opening",
        Plug => "plug",
        Power => "power",
        Presence => "presence",
        Problem => "problem",
        Running => "running",
        Safety => "safety",
        Smoke => "smoke",
        Sound => "sound",
        Tamper => "tamper",
        Update => "update",
        Vibration => "vibration",
        Window => "window",
    }
);

define_taxonomy!(
    /// Value published on a binary sensor state topic.
    BinarySensorState("binary sensor state") {
        Off => "OFF",
        On => "ON",
    }
);

impl From<bool> for BinarySensorState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}
