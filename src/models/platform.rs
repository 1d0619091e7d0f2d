use strum::{Display, EnumString};

/// Flavor of the ping utility, which decides the command-line syntax.
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    /// iputils ping, also used for the other Unix-like systems.
    Linux,
    /// BSD ping as shipped with macOS.
    MacOs,
    Windows,
}

impl Platform {
    /// Return the platform the binary was compiled for.
    pub fn native() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}
