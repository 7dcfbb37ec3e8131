//! Lock taxonomy.

define_taxonomy!(
    /// Value published on a lock state topic.
    ///
    /// Tokens are uppercase, matching the hub's lock defaults.
    LockState("lock state") {
        Unlocked => "UNLOCKED",
        Unlocking => "UNLOCKING",
        Locked => "LOCKED",
        Locking => "LOCKING",
        Jammed => "JAMMED",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_uppercase_tokens_only() {
        assert_eq!("LOCKED".parse::<LockState>().unwrap(), LockState::Locked);
        assert!("locked".parse::<LockState>().is_err());
    }
}
