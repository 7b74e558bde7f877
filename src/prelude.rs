//! Prelude (helpful reexports) for this package

pub use crate::{
    consts::*,
    generator::{
        Burst,
        Generator,
        Mode,
    },
    transport::{
        local::Local,
        mock::Mock,
        Transport,
    },
};
pub use fixed::prelude::*;
