//! Cover taxonomies.

define_taxonomy!(
    /// Presentation class of a cover.
    CoverClass("cover device class") {
        Awning => "awning",
        Blind => "blind",
        Curtain => "curtain",
        Damper => "damper",
        Door => "door",
        Garage => "garage",
        Gate => "gate",
        Shade => "shade",
        Shutter => "shutter",
        Window => "window",
    }
);

define_taxonomy!(
    /// Value published on a cover state topic.
    ///
    /// Unlike locks and binary sensors, cover tokens are lowercase.
    CoverState("cover state") {
        Open => "open",
        Closed => "closed",
        Opening => "opening",
        Closing => "closing",
        Stopped => "stopped",
    }
);
