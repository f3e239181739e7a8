//! A library for parsing USB descriptor blobs and finding the endpoints a
//! host driver needs

use log::*;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod blob;
mod consts;
pub mod descriptor;
mod error;
mod extract;
mod record;
mod request;
mod topology;
mod util;
mod validate;
pub use blob::*;
pub use consts::*;
pub use descriptor::*;
pub use error::*;
pub use extract::*;
pub use record::*;
pub use request::*;
pub use topology::*;
pub use util::*;
pub use validate::*;
