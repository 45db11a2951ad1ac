//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `warden_core::defaults`.

use warden_core::defaults;

/// Generate default value functions that forward to warden_core::defaults constants.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_strict_persistence    => DEFAULT_STRICT_PERSISTENCE: bool,
    default_shutdown_timeout_secs => DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64,
}

default_string_fns! {
    default_users_path    => DEFAULT_USERS_PATH,
    default_sessions_path => DEFAULT_SESSIONS_PATH,
    default_listen        => DEFAULT_LISTEN,
    default_base_path     => DEFAULT_BASE_PATH,
}
