//! Button taxonomy.

define_taxonomy!(
    /// Presentation class of a button.
    ButtonClass("button device class") {
        Identify => "identify",
        Restart => "restart",
        Update => "update",
    }
);
