// This is free and unencumbered software released into the public domain.

mod config;
pub use config::*;

mod driver;
pub use driver::*;

pub mod drivers {
    pub mod profile;

    #[cfg(all(feature = "android", target_os = "android"))]
    pub mod android;
}

mod error;
pub use error::*;

mod layout;
pub use layout::*;

mod open;
pub use open::*;

mod orientation;
pub use orientation::*;

mod session;
pub use session::*;

mod size;
pub use size::*;

mod view;
pub use view::*;
